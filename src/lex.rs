//! Turns the source buffer into words: whitespace and comment skipping,
//! quoted strings, and `$` substitution.
//!
//! Define references are expanded by rewriting the buffer in place and
//! rescanning from the patch point, so an expansion may itself contain
//! further `$` references. Built-in substitutions (`$$`, `$(target*)`,
//! `$(dep[N])`) produce the substituted word directly without touching
//! the buffer.

use crate::eval::{self, Defines};
use crate::graph::{Graph, TargetId};
use crate::scanner::{ParseResult, Scanner};
use crate::{logvv, parse_error};

pub const MAX_WORD_LEN: usize = 254;

/// One token. `newline` is set when at least one newline separated this
/// word from the previous one.
#[derive(Debug, PartialEq)]
pub struct Word {
    pub text: String,
    pub newline: bool,
}

/// Reads the next word, or None at end of input.
pub fn next_word(
    scanner: &mut Scanner,
    defines: &Defines,
    graph: &Graph,
    scope: Option<TargetId>,
) -> ParseResult<Option<Word>> {
    let mut newline = false;
    // The loop restarts after a define expansion rewrites the buffer.
    loop {
        let mut comment = false;
        loop {
            match scanner.peek() {
                '\0' => return Ok(None),
                '#' => {
                    comment = true;
                    scanner.next();
                }
                '\n' => {
                    comment = false;
                    newline = true;
                    scanner.next();
                }
                ' ' | '\t' | '\r' => scanner.next(),
                _ if comment => scanner.next(),
                _ => break,
            }
        }

        let start = scanner.ofs;
        let quoted = scanner.peek() == '"';
        if quoted {
            scanner.next();
        }
        let word_start = scanner.ofs;
        loop {
            let ch = scanner.peek();
            if quoted {
                if ch == '"' {
                    break;
                }
                if ch == '\0' {
                    return parse_error!(scanner, "unterminated quoted string");
                }
            } else if matches!(ch, ' ' | '\t' | '\r' | '\n' | '\0') {
                break;
            }
            scanner.next();
        }
        let end = scanner.ofs;
        if end - word_start > MAX_WORD_LEN {
            return parse_error!(scanner, "maximum word length exceeded");
        }
        let text = scanner.slice(word_start, end);
        if quoted {
            // Skip the closing quote; quoting also suppresses substitution.
            scanner.next();
            return Ok(Some(Word { text, newline }));
        }
        if !text.starts_with('$') {
            return Ok(Some(Word { text, newline }));
        }

        if text.len() == 1 {
            return parse_error!(scanner, "expected symbol after $");
        }
        if text.starts_with("$$") {
            // One '$' escapes the other.
            return Ok(Some(Word {
                text: text[1..].to_owned(),
                newline,
            }));
        }
        if text.as_bytes()[1] == b'(' {
            let text = builtin(scanner, graph, scope, &text)?;
            return Ok(Some(Word { text, newline }));
        }
        match defines.lookup(&text[1..]) {
            Some(value) => {
                // Rewrite the buffer in place and rescan from the patch
                // point. The newline flag survives the rescan.
                let value = value.to_owned();
                logvv!("expanding {:?} -> {:?}", text, value);
                scanner.splice(start, end - start, &value);
                scanner.ofs = start;
            }
            None => return parse_error!(scanner, "undefined symbol {:?}", text),
        }
    }
}

/// Resolves a `$(…)` built-in against the current target scope.
fn builtin(
    scanner: &Scanner,
    graph: &Graph,
    scope: Option<TargetId>,
    word: &str,
) -> ParseResult<String> {
    let scope_target = match scope {
        Some(id) => Some(graph.target(id)),
        None => None,
    };
    match word {
        "$(target)" | "$(target_name)" | "$(target_ext)" => {
            let target = match scope_target {
                Some(target) => target,
                None => {
                    return parse_error!(scanner, "{} must be used inside a target block", word)
                }
            };
            Ok(match word {
                "$(target)" => target.name.clone(),
                "$(target_name)" => eval::basename(&target.name).to_owned(),
                _ => eval::extension(&target.name).to_owned(),
            })
        }
        _ if word.starts_with("$(dep") => {
            let target = match scope_target {
                Some(target) => target,
                None => {
                    return parse_error!(scanner, "{} must be used inside a target block", word)
                }
            };
            let index = match eval::parse_dep_index(word) {
                Ok(index) => index,
                Err(msg) => return parse_error!(scanner, "{}", msg),
            };
            if target.deps.is_empty() {
                return parse_error!(
                    scanner,
                    "no dependencies declared for target {:?}",
                    target.name
                );
            }
            match target.deps.get(index) {
                Some(dep) => Ok(dep.clone()),
                None => parse_error!(
                    scanner,
                    "dependency index {} out of range for target {:?} ({} declared)",
                    index,
                    target.name,
                    target.deps.len()
                ),
            }
        }
        _ => parse_error!(scanner, "undefined symbol {:?}", word),
    }
}
