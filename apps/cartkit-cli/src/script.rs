//! # Cart Scripts
//!
//! A cart script is plain text, one command per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! add Laptop 1 2500.00
//! add "Wireless Mouse" 2 75.00
//! coupon SAVE10
//! remove "Wireless Mouse" 1
//! list
//! total
//! ```
//!
//! Parsing only checks shape (word count, integer quantities). Prices stay
//! as text so the cart's own validation decides what a valid price is.

use thiserror::Error;

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        name: String,
        quantity: i64,
        unit_price: String,
    },
    Remove {
        name: String,
        quantity: Option<i64>,
    },
    Coupon {
        code: String,
    },
    Clear,
    List,
    Total,
}

/// Script syntax errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a whole number")]
    InvalidQuantity(String),

    #[error("unterminated quote")]
    UnterminatedQuote,
}

const ADD_USAGE: &str = "add <name> <quantity> <unit_price>";
const REMOVE_USAGE: &str = "remove <name> [quantity]";
const COUPON_USAGE: &str = "coupon <code>";

/// Parses one line. Blank lines and comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let words = split_words(line)?;
    let Some((verb, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (verb.as_str(), args) {
        ("add", [name, quantity, unit_price]) => Command::Add {
            name: name.clone(),
            quantity: parse_quantity(quantity)?,
            unit_price: unit_price.clone(),
        },
        ("add", _) => return Err(ScriptError::Usage(ADD_USAGE)),

        ("remove", [name]) => Command::Remove {
            name: name.clone(),
            quantity: None,
        },
        ("remove", [name, quantity]) => Command::Remove {
            name: name.clone(),
            quantity: Some(parse_quantity(quantity)?),
        },
        ("remove", _) => return Err(ScriptError::Usage(REMOVE_USAGE)),

        ("coupon", [code]) => Command::Coupon { code: code.clone() },
        ("coupon", _) => return Err(ScriptError::Usage(COUPON_USAGE)),

        ("clear", []) => Command::Clear,
        ("list", []) => Command::List,
        ("total", []) => Command::Total,
        ("clear" | "list" | "total", _) => return Err(ScriptError::Usage("clear | list | total")),

        (other, _) => return Err(ScriptError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn parse_quantity(word: &str) -> Result<i64, ScriptError> {
    word.parse()
        .map_err(|_| ScriptError::InvalidQuantity(word.to_string()))
}

/// Splits on whitespace, honouring double quotes. `#` outside quotes starts
/// a comment.
fn split_words(line: &str) -> Result<Vec<String>, ScriptError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            '#' if !in_quotes => break,
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quotes {
        return Err(ScriptError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}
