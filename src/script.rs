//! Line-oriented command language for driving a [`PathTree`].
//!
//! ```text
//! # comment
//! set /a/b 45
//! get /a/b
//! mv /a/b /c
//! rm /c
//! tree /a
//! leaves
//! ```

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::errors::TreeError;
use crate::tree::PathTree;
use crate::tree_traits::{RenderOptions, TreeNodeConvert};

/// Walks through auto-creation, a subtree move and a removal.
pub const DEMO_SCRIPT: &str = "\
# auto-creates node1 and node2 on the way
set /node1/node2/node3 45
set /node1/node2/node4 25
set /node1/node2 19
tree
get /node1/node2
# graft node2 onto a fresh branch, replacing its contents
set /other 1
mv /node1/node2 /other
tree
rm /other/node3
leaves
";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {source}")]
    Tree {
        line: usize,
        #[source]
        source: TreeError,
    },
}

impl ScriptError {
    pub fn line(&self) -> usize {
        match self {
            ScriptError::Parse { line, .. } | ScriptError::Tree { line, .. } => *line,
        }
    }
}

pub type ScriptResult<T> = Result<T, ScriptError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { path: String, value: i64 },
    Get { path: String },
    Remove { path: String },
    Move { from: String, to: String },
    Tree { path: Option<String> },
    Leaves,
}

/// Parses one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(text: &str) -> Result<Option<Command>, String> {
    let text = text.split('#').next().unwrap_or_default().trim();
    let mut words = text.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (keyword, args.as_slice()) {
        ("set", [path, value]) => Command::Set {
            path: path.to_string(),
            value: value
                .parse::<i64>()
                .map_err(|e| format!("invalid value '{}': {}", value, e))?,
        },
        ("get", [path]) => Command::Get {
            path: path.to_string(),
        },
        ("rm", [path]) => Command::Remove {
            path: path.to_string(),
        },
        ("mv", [from, to]) => Command::Move {
            from: from.to_string(),
            to: to.to_string(),
        },
        ("tree", []) => Command::Tree { path: None },
        ("tree", [path]) => Command::Tree {
            path: Some(path.to_string()),
        },
        ("leaves", []) => Command::Leaves,
        ("set" | "get" | "rm" | "mv" | "tree" | "leaves", _) => {
            return Err(format!("wrong number of arguments for '{}'", keyword))
        }
        _ => return Err(format!("unknown command '{}'", keyword)),
    };
    Ok(Some(command))
}

/// Parses a whole script into `(line number, command)` pairs, 1-based.
pub fn parse(source: &str) -> ScriptResult<Vec<(usize, Command)>> {
    let mut commands = Vec::new();
    for (i, text) in source.lines().enumerate() {
        let line = i + 1;
        if let Some(command) =
            parse_line(text).map_err(|message| ScriptError::Parse { line, message })?
        {
            commands.push((line, command));
        }
    }
    Ok(commands)
}

/// Applies one command, returning the text it prints, if any.
pub fn execute(
    tree: &mut PathTree,
    command: &Command,
    options: &RenderOptions,
) -> Result<Option<String>, TreeError> {
    match command {
        Command::Set { path, value } => tree.set_data(path, *value).map(|_| None),
        Command::Get { path } => tree.get_data(path).map(|v| Some(v.to_string())),
        Command::Remove { path } => tree.remove_node(path).map(|_| None),
        Command::Move { from, to } => tree.move_node(from, to).map(|_| None),
        Command::Tree { path } => {
            let node = match path {
                Some(p) => tree.get_node(p)?,
                None => tree.root(),
            };
            let rendered = node.to_tree_with(options).to_string();
            Ok(Some(rendered.trim_end().to_string()))
        }
        Command::Leaves => Ok(Some(tree.leaf_paths().join("\n"))),
    }
}

/// Collected results of a script run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub output: Vec<String>,
    pub errors: Vec<ScriptError>,
    pub executed: usize,
}

/// Runs scripts against a tree.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    options: RenderOptions,
    keep_going: bool,
}

impl Runner {
    pub fn new(options: RenderOptions, keep_going: bool) -> Self {
        Self {
            options,
            keep_going,
        }
    }

    /// Parses the whole script, then executes it line by line.
    ///
    /// A parse error aborts before anything runs. A tree error aborts the
    /// run unless `keep_going` is set, in which case it is recorded in the
    /// report and execution continues with the next line.
    #[instrument(level = "debug", skip(self, tree, source))]
    pub fn run(&self, tree: &mut PathTree, source: &str) -> ScriptResult<RunReport> {
        let commands = parse(source)?;
        let mut report = RunReport::default();

        for (line, command) in &commands {
            debug!("line {}: {:?}", line, command);
            match execute(tree, command, &self.options) {
                Ok(output) => {
                    report.executed += 1;
                    report.output.extend(output);
                }
                Err(source) => {
                    let err = ScriptError::Tree {
                        line: *line,
                        source,
                    };
                    if !self.keep_going {
                        return Err(err);
                    }
                    warn!("{}", err);
                    report.errors.push(err);
                }
            }
        }
        Ok(report)
    }
}
