//! Commando actions and their parameter order
//!
//! The remote side recomputes the token over the parameters in the order
//! they appear in the query, so each action pins its key order here.

use crate::auth::QueryParams;

/// A Commando webservice action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    /// `act=cscliste&cli=...`
    CscList { client_code: &'a str },

    /// `act=reliq&cli=...&ref=...`
    Backorders { client_code: &'a str, refs: &'a str },

    /// `act=dispo&ref=...[&alert=1]`
    StockAvailability { refs: &'a str, with_alert: bool },

    /// `act=tarif&cli=...&ref=...[&fullinfo=1]`
    Pricing {
        client_code: &'a str,
        refs: &'a str,
        full_info: bool,
    },
}

impl Action<'_> {
    /// Value of the `act` parameter
    pub fn act(&self) -> &'static str {
        match self {
            Action::CscList { .. } => "cscliste",
            Action::Backorders { .. } => "reliq",
            Action::StockAvailability { .. } => "dispo",
            Action::Pricing { .. } => "tarif",
        }
    }

    /// Parameters in signing order. Optional flags are appended last and
    /// omitted entirely when unset.
    pub fn params(&self) -> QueryParams {
        let params = QueryParams::new().with("act", self.act());
        match *self {
            Action::CscList { client_code } => params.with("cli", client_code),
            Action::Backorders { client_code, refs } => {
                params.with("cli", client_code).with("ref", refs)
            }
            Action::StockAvailability { refs, with_alert } => {
                params.with("ref", refs).with_if(with_alert, "alert", "1")
            }
            Action::Pricing {
                client_code,
                refs,
                full_info,
            } => params
                .with("cli", client_code)
                .with("ref", refs)
                .with_if(full_info, "fullinfo", "1"),
        }
    }
}

/// Join product references the way Commando expects them (`A,B,C`)
pub fn join_references<S: AsRef<str>>(refs: &[S]) -> String {
    refs.iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
