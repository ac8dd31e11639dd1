//! A module implementing lexical analysis for the shell's tiny command language.
//!
//! There is no quoting and no escaping: a line is cut into commands at every `;`,
//! and a command is cut into words at every run of spaces and tabs.
//!
//! Lines are handled as raw bytes. Words become [`OsString`]s unchanged, so a file
//! or program name that is not valid UTF-8 reaches the OS exactly as typed.

use regex::bytes::Regex;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::sync::LazyLock;

/// A maximal run of bytes that are neither space nor tab.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)[^ \t]+").expect("word pattern is valid"));

/// Splits a line into the commands separated by `;`.
///
/// Empty segments (from `;;`, or a leading/trailing `;`) are dropped, so a stray
/// separator never yields a command of its own. Segments that are only whitespace
/// are kept; they tokenize to nothing and run as no-ops.
///
/// # Arguments
/// * `line` - The input line, without its trailing newline.
///
/// # Returns
/// The command slices in input order, borrowed from `line`.
pub fn split_commands(line: &[u8]) -> Vec<&[u8]> {
    line.split(|&b| b == b';')
        .filter(|cmd| !cmd.is_empty())
        .collect()
}

/// Splits a command into whitespace-separated words.
///
/// Leading, trailing and repeated spaces or tabs are all treated alike; no empty
/// word is ever produced.
///
/// # Arguments
/// * `text` - A command, or the filename part of a redirection.
///
/// # Returns
/// The words in order, possibly none.
pub fn split_args(text: &[u8]) -> Vec<OsString> {
    WORD.find_iter(text)
        .map(|word| OsStr::from_bytes(word.as_bytes()).to_os_string())
        .collect()
}

/// True when `bytes` holds nothing but C `isspace` characters.
pub fn is_blank(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c))
}
