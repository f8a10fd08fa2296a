//! The rule engine: a data-driven table of syntax rules and the driver
//! that feeds tokenizer words through it, populating the model store.
//!
//! Rules are data, not code. Each rule is a keyword list plus one or more
//! recipes (ordered step sequences); symbol and block hooks are named by
//! enum and dispatched by the engine, so adding a directive is a table
//! edit.

use crate::eval::Defines;
use crate::graph::{Graph, TargetId};
use crate::lex::{self, Word};
use crate::scanner::{ParseError, ParseResult, Scanner};
use crate::{logv, logvv, parse_error};
use std::path::Path;

/// One step of a recipe.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// The next keyword of the rule, matched by exact equality.
    Keyword,
    /// Any word; handed to the rule's symbol hook.
    Symbol,
    /// A `{ … }` block of entries, one per source line.
    List,
    /// A `{ … }` block containing further directives.
    NestedRule,
    /// Recipe complete.
    End,
}

/// What to do with the word consumed by a SYMBOL step.
#[derive(Debug, Clone, Copy)]
enum SymbolHook {
    SetBuildTarget,
    AddTarget,
    Define,
}

/// What a `{` opening a block under this rule means.
#[derive(Debug, Clone, Copy)]
enum BlockHook {
    /// `target NAME {`: enter the target's scope.
    TargetScope,
    /// `depends on {`: entries are the target's dependencies.
    DependsList,
    /// `created using {`: entries are the target's commands.
    CreatedList,
    /// `define { … } as V`: the braces enclose the names being defined.
    DefineNames,
}

struct SyntaxRule {
    keywords: &'static [&'static str],
    recipes: &'static [&'static [Step]],
    symbol: Option<SymbolHook>,
    block: Option<BlockHook>,
}

use Step::*;

static RULES: &[SyntaxRule] = &[
    // build NAME
    SyntaxRule {
        keywords: &["build"],
        recipes: &[&[Keyword, Symbol, End]],
        symbol: Some(SymbolHook::SetBuildTarget),
        block: None,
    },
    // target NAME { … }
    SyntaxRule {
        keywords: &["target"],
        recipes: &[&[Keyword, Symbol, NestedRule, End]],
        symbol: Some(SymbolHook::AddTarget),
        block: Some(BlockHook::TargetScope),
    },
    // define NAME as VALUE, or define { NAME… } as VALUE
    SyntaxRule {
        keywords: &["define", "as"],
        recipes: &[
            &[Keyword, Symbol, Keyword, Symbol, End],
            &[Keyword, List, Keyword, Symbol, End],
        ],
        symbol: Some(SymbolHook::Define),
        block: Some(BlockHook::DefineNames),
    },
    // created using { … }
    SyntaxRule {
        keywords: &["created", "using"],
        recipes: &[&[Keyword, Keyword, List, End]],
        symbol: None,
        block: Some(BlockHook::CreatedList),
    },
    // depends on { … }
    SyntaxRule {
        keywords: &["depends", "on"],
        recipes: &[&[Keyword, Keyword, List, End]],
        symbol: None,
        block: Some(BlockHook::DependsList),
    },
];

/// Nesting is capped at two levels: the top level and the inside of one
/// `target { … }` block. A deeper push is ignored.
const MAX_NESTING: usize = 2;

/// Per-level position within a claimed rule.
#[derive(Clone, Copy, Default)]
struct Cursor {
    recipe: usize,
    step: usize,
    keyword: usize,
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    /// Looking for a rule whose first keyword matches the next word.
    Searching,
    /// Feeding words to the claimed rule.
    Checking(usize),
}

pub struct Parser {
    scanner: Scanner,
    pub graph: Graph,
    pub defines: Defines,
    pub build_target: Option<String>,

    state: State,
    level: usize,
    cursors: [Cursor; MAX_NESTING],
    /// Target whose block we are inside. Set when a `target NAME {`
    /// opens; it is not cleared on block exit, the last-entered target
    /// remains current.
    scope: Option<TargetId>,
    /// Names collected by a DEFINE_AS rule, waiting for their value.
    pending_defines: Vec<String>,
}

impl Parser {
    pub fn new(buf: Vec<u8>) -> Parser {
        Parser {
            scanner: Scanner::new(buf),
            graph: Graph::new(),
            defines: Defines::default(),
            build_target: None,
            state: State::Searching,
            level: 0,
            cursors: [Cursor::default(); MAX_NESTING],
            scope: None,
            pending_defines: Vec::new(),
        }
    }

    pub fn parse(&mut self) -> ParseResult<()> {
        while let Some(word) =
            lex::next_word(&mut self.scanner, &self.defines, &self.graph, self.scope)?
        {
            self.feed(word)?;
        }
        Ok(())
    }

    pub fn format_parse_error(&self, filename: &Path, err: ParseError) -> anyhow::Error {
        self.scanner.format_parse_error(filename, err)
    }

    /// The (possibly expanded) program text, for preprocess-only mode.
    pub fn expanded_text(&self) -> &[u8] {
        self.scanner.text()
    }

    fn feed(&mut self, word: Word) -> ParseResult<()> {
        match self.state {
            State::Searching => self.search(word),
            State::Checking(rule) => self.check(rule, word),
        }
    }

    fn search(&mut self, word: Word) -> ParseResult<()> {
        if word.text == "}" {
            self.pop_level();
            return Ok(());
        }
        for (i, rule) in RULES.iter().enumerate() {
            if word.text == rule.keywords[0] {
                self.cursors[self.level] = Cursor::default();
                self.state = State::Checking(i);
                return self.check(i, word);
            }
        }
        // Words matching no rule are skipped.
        logvv!("skipping unmatched word {:?}", word.text);
        Ok(())
    }

    fn check(&mut self, rule_i: usize, word: Word) -> ParseResult<()> {
        let rule = &RULES[rule_i];
        let cur = self.cursors[self.level];
        match rule.recipes[cur.recipe][cur.step] {
            Keyword => {
                match rule.keywords.get(cur.keyword) {
                    Some(keyword) if word.text == *keyword => {
                        self.cursors[self.level].keyword += 1;
                        self.advance(rule_i);
                    }
                    _ if word.text == "}" => {
                        self.pop_level();
                        self.discard_rule();
                    }
                    _ => {
                        // Try the next alternative recipe at the same
                        // position; with none left the rule is discarded.
                        if cur.recipe + 1 < rule.recipes.len() {
                            self.cursors[self.level].recipe = cur.recipe + 1;
                            return self.check(rule_i, word);
                        }
                        self.discard_rule();
                    }
                }
                Ok(())
            }
            Symbol => {
                // A `{` at a symbol position selects a sibling recipe with
                // LIST there (`define { … } as V`).
                if word.text == "{" {
                    if let Some(alt) = rule
                        .recipes
                        .iter()
                        .position(|recipe| recipe.get(cur.step) == Some(&List))
                    {
                        if alt != cur.recipe {
                            self.cursors[self.level].recipe = alt;
                            return self.check(rule_i, word);
                        }
                    }
                }
                self.symbol(rule_i, &word.text)?;
                self.advance(rule_i);
                Ok(())
            }
            List => self.list(rule_i, word),
            NestedRule => {
                match word.text.as_str() {
                    "{" => {
                        self.cursors[self.level] = Cursor::default();
                        self.push_level();
                        self.block_opened(rule_i)?;
                    }
                    "}" => {}
                    // A stray word between the name and its block is
                    // dropped.
                    _ => logvv!("skipping {:?} before block", word.text),
                }
                self.state = State::Searching;
                Ok(())
            }
            End => {
                self.finish_recipe();
                Ok(())
            }
        }
    }

    /// Moves the claimed rule to its next step; reaching END completes the
    /// recipe.
    fn advance(&mut self, rule_i: usize) {
        let cur = &mut self.cursors[self.level];
        cur.step += 1;
        if RULES[rule_i].recipes[cur.recipe][cur.step] == End {
            self.finish_recipe();
        } else {
            self.state = State::Checking(rule_i);
        }
    }

    fn finish_recipe(&mut self) {
        self.cursors[self.level] = Cursor::default();
        self.pop_level();
        self.state = State::Searching;
    }

    /// Abandons a half-matched rule, dropping anything it collected.
    fn discard_rule(&mut self) {
        self.pending_defines.clear();
        self.cursors[self.level] = Cursor::default();
        self.state = State::Searching;
    }

    fn push_level(&mut self) {
        if self.level + 1 < MAX_NESTING {
            self.level += 1;
            self.cursors[self.level] = Cursor::default();
        }
    }

    fn pop_level(&mut self) {
        if self.level > 0 {
            self.level -= 1;
        }
    }

    fn symbol(&mut self, rule_i: usize, word: &str) -> ParseResult<()> {
        match RULES[rule_i].symbol {
            Some(SymbolHook::SetBuildTarget) => {
                if self.build_target.is_some() {
                    return parse_error!(self.scanner, "only one build target can be defined");
                }
                logv!("build target set to {:?}", word);
                self.build_target = Some(word.to_owned());
            }
            Some(SymbolHook::AddTarget) => {
                if self.graph.add_target(word).is_none() {
                    return parse_error!(
                        self.scanner,
                        "target {:?} has already been defined",
                        word
                    );
                }
                let targets = self.graph.targets();
                logv!("targets list: {}", targets.len());
                for (i, target) in targets.iter().enumerate() {
                    logv!("\t{}/{}: {}", i + 1, targets.len(), target.name);
                }
            }
            Some(SymbolHook::Define) => {
                if self.cursors[self.level].keyword < 2 {
                    // Name position, before `as`.
                    self.pending_defines.push(word.to_owned());
                } else {
                    for name in self.pending_defines.drain(..) {
                        logvv!("define {:?} -> {:?}", name, word);
                        self.defines.insert(name, word.to_owned());
                    }
                }
            }
            None => {}
        }
        Ok(())
    }

    fn block_opened(&mut self, rule_i: usize) -> ParseResult<()> {
        match RULES[rule_i].block {
            Some(BlockHook::TargetScope) => match self.graph.last_target() {
                Some(id) => {
                    self.scope = Some(id);
                    Ok(())
                }
                None => parse_error!(self.scanner, "target block without a target name"),
            },
            Some(_) => Ok(()),
            None => parse_error!(
                self.scanner,
                "keyword {:?} does not accept a block",
                RULES[rule_i].keywords[0]
            ),
        }
    }

    fn list(&mut self, rule_i: usize, word: Word) -> ParseResult<()> {
        if word.text == "{" {
            return self.block_opened(rule_i);
        }
        if word.text == "}" {
            // Close the list. When more steps follow (the define form's
            // `as VALUE`), keep checking; otherwise resume the search
            // without running the recipe's END.
            let cur = self.cursors[self.level];
            if RULES[rule_i].recipes[cur.recipe][cur.step + 1] == End {
                self.cursors[self.level] = Cursor::default();
                self.state = State::Searching;
            } else {
                self.cursors[self.level].step += 1;
            }
            return Ok(());
        }

        let entries = match RULES[rule_i].block {
            Some(BlockHook::DependsList) => match self.scope {
                Some(id) => &mut self.graph.target_mut(id).deps,
                None => {
                    return parse_error!(self.scanner, "dependency list outside a target block")
                }
            },
            Some(BlockHook::CreatedList) => match self.scope {
                Some(id) => &mut self.graph.target_mut(id).cmds,
                None => return parse_error!(self.scanner, "command list outside a target block"),
            },
            Some(BlockHook::DefineNames) => {
                // Each word in the braces is its own define name.
                self.pending_defines.push(word.text);
                return Ok(());
            }
            _ => return parse_error!(self.scanner, "list outside a block context"),
        };
        if word.newline || entries.is_empty() {
            entries.push(word.text);
        } else {
            // Same line as the previous entry: continuation.
            let last = entries.last_mut().unwrap();
            last.push(' ');
            last.push_str(&word.text);
        }
        Ok(())
    }
}
