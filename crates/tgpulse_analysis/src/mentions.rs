use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;
use tgpulse_shared_models::MentionTally;

static CASH_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[A-Za-z]+").expect("cash tag pattern is valid"));

/// Counts cash tags (`$` followed by letters) across all texts.
pub fn most_mentioned<I, S>(texts: I) -> MentionTally
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = texts
        .into_iter()
        .map(|text| text.as_ref().to_owned())
        .join(" ");

    let counts = CASH_TAG
        .find_iter(&joined)
        .map(|tag| tag.as_str().to_owned())
        .counts();

    MentionTally::from(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn counts_each_cash_tag() {
        let tally = most_mentioned(["$AAPL $AAPL $TSLA"]);

        assert_eq!(tally.get("$AAPL"), Some(2));
        assert_eq!(tally.get("$TSLA"), Some(1));
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn names_are_distinct_across_texts() {
        let tally = most_mentioned(vec![
            "$BTC up".to_string(),
            "$BTC and $ETH".to_string(),
            "no tags".to_string(),
        ]);

        let names: Vec<&str> = tally.iter().map(|(name, _)| name).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(tally.get("$BTC"), Some(2));
        assert_eq!(tally.get("$ETH"), Some(1));
    }

    #[test]
    fn tag_stops_at_first_non_letter() {
        let tally = most_mentioned(["$SOL2 $100 $eth."]);

        assert_eq!(tally.get("$SOL"), Some(1));
        assert_eq!(tally.get("$eth"), Some(1));
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn texts_are_joined_with_spaces() {
        let tally = most_mentioned(["ends with $AB", "CD starts"]);

        assert_eq!(tally.get("$AB"), Some(1));
        assert_eq!(tally.get("$ABCD"), None);
    }

    #[test]
    fn no_texts_no_tags() {
        assert!(most_mentioned(Vec::<String>::new()).is_empty());
    }
}
