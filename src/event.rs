use serde::Deserialize;
use serde::Deserializer;

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::moneymatch::MatchId;

/// Inbound event observed on the ledger for a single match.
#[derive(Debug, Clone, Copy, parse_display::Display)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum MatchEvent {
    #[display("{0}")]
    Create(Create),
    #[display("{0}")]
    Accept(Accept),
    #[display("{0}")]
    Decline(Decline),
    #[display("{0}")]
    Vote(Vote),
}

impl MatchEvent {
    pub const fn match_id(&self) -> MatchId {
        match self {
            Self::Create(Create { match_id, .. })
            | Self::Accept(Accept { match_id, .. })
            | Self::Decline(Decline { match_id, .. })
            | Self::Vote(Vote { match_id, .. }) => *match_id,
        }
    }

    pub const fn actor(&self) -> Address {
        match self {
            Self::Create(Create { initiator: actor, .. })
            | Self::Accept(Accept { actor, .. })
            | Self::Decline(Decline { actor, .. })
            | Self::Vote(Vote { actor, .. }) => *actor,
        }
    }
}

impl<'de> Deserialize<'de> for MatchEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CsvRow {
            r#type: String,
            r#match: MatchId,
            actor: Address,
            counterpart: Option<Address>,
            amount: Option<TokenAmount>,
            max_matches: Option<u32>,
            winner: Option<Address>,
        }

        let row = CsvRow::deserialize(deserializer)?;
        let missing = |field: &'static str| <D::Error as serde::de::Error>::missing_field(field);

        let event = match row.r#type.as_str() {
            "create" => Self::Create(Create {
                match_id: row.r#match,
                initiator: row.actor,
                opponent: row.counterpart.ok_or_else(|| missing("counterpart"))?,
                amount: row.amount.ok_or_else(|| missing("amount"))?,
                max_matches: row.max_matches.ok_or_else(|| missing("max_matches"))?,
            }),
            "accept" => Self::Accept(Accept {
                match_id: row.r#match,
                actor: row.actor,
            }),
            "decline" => Self::Decline(Decline {
                match_id: row.r#match,
                actor: row.actor,
            }),
            "vote" => Self::Vote(Vote {
                match_id: row.r#match,
                actor: row.actor,
                claimed_winner: row.winner.ok_or_else(|| missing("winner"))?,
            }),
            other => {
                return Err(serde::de::Error::unknown_variant(
                    other,
                    &["create", "accept", "decline", "vote"],
                ));
            }
        };

        Ok(event)
    }
}

#[derive(Debug, Clone, Copy, parse_display::Display)]
#[display("event=(create match={match_id} initiator={initiator} opponent={opponent} amount={amount} max_matches={max_matches})")]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Create {
    pub match_id: MatchId,
    pub initiator: Address,
    pub opponent: Address,
    pub amount: TokenAmount,
    pub max_matches: u32,
}

#[derive(Debug, Clone, Copy, parse_display::Display)]
#[display("event=(accept match={match_id} actor={actor})")]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Accept {
    pub match_id: MatchId,
    pub actor: Address,
}

#[derive(Debug, Clone, Copy, parse_display::Display)]
#[display("event=(decline match={match_id} actor={actor})")]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Decline {
    pub match_id: MatchId,
    pub actor: Address,
}

#[derive(Debug, Clone, Copy, parse_display::Display)]
#[display("event=(vote match={match_id} actor={actor} winner={claimed_winner})")]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Vote {
    pub match_id: MatchId,
    pub actor: Address,
    pub claimed_winner: Address,
}

#[cfg(test)]
mod tests {
    use csv::Trim;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const A: &str = "0x1111111111111111111111111111111111111111";
    const B: &str = "0x2222222222222222222222222222222222222222";

    #[rstest]
    #[case(
        format!("create,1,{A},{B},2.5,3,"),
        MatchEvent::Create(Create {
            match_id: MatchId(1),
            initiator: addr(A),
            opponent: addr(B),
            amount: TokenAmount::from_units(2_500_000_000_000_000_000),
            max_matches: 3,
        })
    )]
    #[case(
        format!("accept,2,{B},,,,"),
        MatchEvent::Accept(Accept {
            match_id: MatchId(2),
            actor: addr(B),
        })
    )]
    #[case(
        format!("decline,3,{B},,,,"),
        MatchEvent::Decline(Decline {
            match_id: MatchId(3),
            actor: addr(B),
        })
    )]
    #[case(
        format!("vote,4,{A},,,,{B}"),
        MatchEvent::Vote(Vote {
            match_id: MatchId(4),
            actor: addr(A),
            claimed_winner: addr(B),
        })
    )]
    fn deserialize_match_event_returns_the_expected_events(#[case] csv_row: String, #[case] expected: MatchEvent) {
        assert2::let_assert!(Ok(events) = deserialize_csv_rows(&csv_row));
        assert_eq!([expected], events.as_slice());
    }

    #[rstest]
    #[case(format!("create,5,{A},,10,3,"), "missing field `counterpart`")]
    #[case(format!("create,5,{A},{B},,3,"), "missing field `amount`")]
    #[case(format!("create,5,{A},{B},10,,"), "missing field `max_matches`")]
    #[case(format!("create,5,{A},{B},-1,3,"), "amount must not be negative")]
    #[case(format!("vote,6,{A},,,,"), "missing field `winner`")]
    #[case("vote,6,0xnothex,,,,0x".to_string(), "invalid address")]
    #[case(
        format!("foobar,7,{A},,,,"),
        "unknown variant `foobar`, expected one of `create`, `accept`, `decline`, `vote`"
    )]
    fn deserialize_match_event_returns_the_expected_error(#[case] csv_row: String, #[case] expected_substr: &str) {
        assert2::let_assert!(Err(error) = deserialize_csv_rows(&csv_row));
        assert!(
            error.to_string().contains(expected_substr),
            "error={error:?} does not contain expected={expected_substr}'",
        );
    }

    #[test]
    fn match_event_exposes_match_id_and_actor() {
        let event = deserialize_csv_rows(&format!("vote,9,{A},,,,{B}")).unwrap().remove(0);
        assert_eq!(MatchId(9), event.match_id());
        assert_eq!(addr(A), event.actor());
    }

    fn deserialize_csv_rows(row: &str) -> Result<Vec<MatchEvent>, csv::Error> {
        let data = format!("type,match,actor,counterpart,amount,max_matches,winner\n{row}");
        let mut rdr = csv::ReaderBuilder::new().trim(Trim::All).from_reader(data.as_bytes());
        let mut out = Vec::new();
        for rec in rdr.deserialize::<MatchEvent>() {
            out.push(rec?);
        }
        Ok(out)
    }

    fn addr(value: &str) -> Address {
        value.parse().unwrap()
    }
}
