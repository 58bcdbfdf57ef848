//! Instrument list parsing.
//!
//! Instruments come from configuration as a comma-separated list of ticker
//! symbols (exchange suffixes such as `.NS` are part of the symbol).

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in instrument list")]
    EmptyToken,

    #[error("duplicate instrument: {0}")]
    DuplicateInstrument(String),

    #[error("invalid instrument symbol: {0}")]
    InvalidSymbol(String),
}

pub fn parse_instruments(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '_'))
        {
            return Err(UniverseError::InvalidSymbol(trimmed.to_string()));
        }

        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateInstrument(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let result = parse_instruments("RELIANCE.NS,INFY.NS,TCS.NS").unwrap();
        assert_eq!(result, vec!["RELIANCE.NS", "INFY.NS", "TCS.NS"]);
    }

    #[test]
    fn parse_with_whitespace() {
        let result = parse_instruments("  RELIANCE.NS , INFY.NS ,TCS.NS  ").unwrap();
        assert_eq!(result, vec!["RELIANCE.NS", "INFY.NS", "TCS.NS"]);
    }

    #[test]
    fn parse_uppercases() {
        let result = parse_instruments("infy.ns,aapl").unwrap();
        assert_eq!(result, vec!["INFY.NS", "AAPL"]);
    }

    #[test]
    fn parse_index_and_fx_symbols() {
        let result = parse_instruments("^NSEI,EURUSD=X,BRK-B").unwrap();
        assert_eq!(result, vec!["^NSEI", "EURUSD=X", "BRK-B"]);
    }

    #[test]
    fn parse_empty_token() {
        assert_eq!(parse_instruments("INFY.NS,,TCS.NS"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_instruments(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_duplicate() {
        let result = parse_instruments("TCS.NS,INFY.NS,tcs.ns");
        assert_eq!(result, Err(UniverseError::DuplicateInstrument("TCS.NS".into())));
    }

    #[test]
    fn parse_invalid_symbol() {
        let result = parse_instruments("TCS.NS,../etc/passwd");
        assert!(matches!(result, Err(UniverseError::InvalidSymbol(_))));
    }
}
