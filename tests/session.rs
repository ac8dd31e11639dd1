use myshell::config::Config;
use myshell::env::Environment;
use myshell::error::ERROR_MESSAGE;
use myshell::{Interpreter, Mode, Session};
use std::ffi::OsStr;
use std::fs;
use std::io::Cursor;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = fs::canonicalize(dir.path()).expect("canonical temp dir");
        Self { dir, root }
    }

    fn interpreter(&self) -> Interpreter {
        let mut env = Environment::new();
        env.current_dir = self.root.clone();
        Interpreter::with_env(env, Config::default())
    }

    fn batch(&self, sh: &mut Interpreter, script: &str) -> String {
        self.session(sh, script, Mode::Batch)
    }

    fn session(&self, sh: &mut Interpreter, script: &str, mode: Mode) -> String {
        let out = self.session_raw(sh, script.as_bytes(), mode);
        String::from_utf8(out).expect("utf-8 transcript")
    }

    fn session_raw(&self, sh: &mut Interpreter, script: &[u8], mode: Mode) -> Vec<u8> {
        let config = Config::default();
        let mut session = Session::new(Cursor::new(script.to_vec()), Vec::new(), mode, &config);
        session.run(sh).expect("session i/o");
        session.into_output()
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("read output file")
    }
}

#[test]
fn whitespace_only_script_does_nothing() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();

    let out = fx.batch(&mut sh, "   \n\t\n \t \n");

    assert_eq!(out, "");
    assert_eq!(fs::read_dir(fx.dir.path()).unwrap().count(), 0);
}

#[test]
fn two_commands_on_one_line_are_independent() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();

    let out = fx.batch(&mut sh, "no-such-program-here ; echo ok > out.txt\n");

    assert_eq!(
        out,
        format!("no-such-program-here ; echo ok > out.txt\n{ERROR_MESSAGE}")
    );
    assert_eq!(fx.read("out.txt"), "ok\n");
}

#[test]
fn prepend_and_overwrite_rules() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();

    let script = "echo first > out.txt\n\
                  echo again > out.txt\n\
                  echo second >+ out.txt\n\
                  echo hi > a > b\n";
    let out = fx.batch(&mut sh, script);

    assert_eq!(
        out,
        format!(
            "echo first > out.txt\n\
             echo again > out.txt\n{ERROR_MESSAGE}\
             echo second >+ out.txt\n\
             echo hi > a > b\n{ERROR_MESSAGE}"
        )
    );
    assert_eq!(fx.read("out.txt"), "second\nfirst\n");
    assert!(!fx.dir.path().join("a").exists());
    assert!(!fx.dir.path().join("temp").exists());
}

#[test]
fn repeated_prepends_lose_nothing() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();
    fs::write(fx.dir.path().join("log"), "first\n").unwrap();

    fx.batch(&mut sh, "echo second >+ log\necho third >+ log;echo fourth>+log\n");

    assert_eq!(fx.read("log"), "fourth\nthird\nsecond\nfirst\n");
}

#[test]
fn missing_program_reports_into_redirection_targets() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();
    fs::write(fx.dir.path().join("o2"), "old\n").unwrap();

    let out = fx.batch(&mut sh, "nosuchprog > o1\nnosuchprog >+ o2\n");

    assert_eq!(out, "nosuchprog > o1\nnosuchprog >+ o2\n");
    assert_eq!(fx.read("o1"), ERROR_MESSAGE);
    assert_eq!(fx.read("o2"), format!("{ERROR_MESSAGE}old\n"));
    assert!(!fx.dir.path().join("temp").exists());
}

#[test]
fn non_utf8_filename_is_created_byte_for_byte() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();
    let script = b"echo hi > caf\xe9.txt\n";

    let out = fx.session_raw(&mut sh, script, Mode::Batch);

    assert_eq!(out, script);
    let name = OsStr::from_bytes(b"caf\xe9.txt");
    let entries: Vec<_> = fs::read_dir(fx.dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![name.to_os_string()]);
    assert_eq!(fs::read_to_string(fx.dir.path().join(name)).unwrap(), "hi\n");
}

#[test]
fn cd_home_then_pwd() {
    let fx = Fixture::new();
    let home = fx.root.join("home");
    fs::create_dir(&home).unwrap();
    let mut sh = fx.interpreter();
    sh.env_mut()
        .set_var("HOME", home.to_string_lossy().to_string());

    let out = fx.batch(&mut sh, "cd\npwd\n");

    assert_eq!(out, format!("cd\npwd\n{}\n", home.display()));
    assert_eq!(sh.env().current_dir, home);
}

#[test]
fn exit_with_argument_does_not_end_session() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();

    let out = fx.batch(&mut sh, "exit extra\npwd\nexit\npwd\n");

    assert_eq!(
        out,
        format!(
            "exit extra\n{ERROR_MESSAGE}pwd\n{}\nexit\n",
            fx.root.display()
        )
    );
    assert!(sh.should_exit());
}

#[test]
fn overlong_line_runs_nothing() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();
    let filler = format!("echo x > out.txt;{}", " ".repeat(600 - 17));
    assert_eq!(filler.len(), 600);

    let out = fx.batch(&mut sh, &filler);

    assert_eq!(out, format!("{filler}{ERROR_MESSAGE}"));
    assert_eq!(out.matches(ERROR_MESSAGE).count(), 1);
    assert!(!fx.dir.path().join("out.txt").exists());
}

#[test]
fn interactive_transcript() {
    let fx = Fixture::new();
    let mut sh = fx.interpreter();

    let out = fx.session(&mut sh, "pwd extra\n\n", Mode::Interactive);

    assert_eq!(
        out,
        format!("myshell> pwd extra\n{ERROR_MESSAGE}myshell> \nmyshell> {ERROR_MESSAGE}")
    );
}
