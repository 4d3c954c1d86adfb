use chrono::NaiveDate;
use serde::Deserialize;
use std::io::{BufRead, BufReader, Read};

use crate::domain::forms::{ShopForm, SignUpForm};
use crate::domain::payment::PaymentMethod;
use crate::error::Result;

/// One back-office action, as submitted on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    SignUp {
        #[serde(flatten)]
        form: SignUpForm,
    },
    RegisterShop {
        owner: u32,
        #[serde(flatten)]
        form: ShopForm,
    },
    ApproveShop {
        shop: u32,
    },
    RejectShop {
        shop: u32,
    },
    UpdateShop {
        shop: u32,
        #[serde(flatten)]
        form: ShopForm,
    },
    DeleteShop {
        shop: u32,
    },
    /// Owner settles the current cycle.
    Pay {
        shop: u32,
        method: Option<PaymentMethod>,
    },
    /// Admin marks the current cycle paid.
    MarkPaid {
        shop: u32,
        method: Option<PaymentMethod>,
    },
    Remind {
        shop: u32,
    },
    /// Runs the overdue sweep as of the given date.
    EnforceOverdue {
        today: NaiveDate,
    },
}

/// Reads commands from a JSON-lines source.
///
/// Wraps any `Read` and yields one `Result<Command>` per non-blank line, so
/// a malformed line surfaces as an error for that item while the stream
/// keeps going.
pub struct CommandReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Lazily reads and deserializes commands.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str(&line).map_err(Into::into)),
            Err(e) => Some(Err(e.into())),
        })
    }
}
