use std::sync::LazyLock;

use fancy_regex::Regex;

use super::Predicate;

// Captures `name:value` pairs, where quoted values may contain whitespace
// (`regex:"kappa 123"`), and everything else separated by whitespace as bare
// words.
static PREDICATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:(?<name>\w+):(?<value>".+?"|[^\s]+))|[^\s]+?(?=$|\s)"#)
        .expect("valid predicate regex")
});

/// Parses a search query into the predicates a message must all satisfy.
///
/// `from:` and `in:` values are collected into a single author and a single
/// channel predicate, appended after all other predicates. Unknown names and
/// bare words become substring predicates of the whole token, quotes and all.
pub fn parse(input: &str) -> Vec<Predicate> {
    let mut predicates = vec![];
    let mut authors = vec![];
    let mut channels = vec![];

    for captures in PREDICATE_REGEX.captures_iter(input).filter_map(Result::ok)
    {
        let token = captures.get(0).map_or("", |m| m.as_str());
        let name = captures.name("name").map_or("", |m| m.as_str());
        let value = captures
            .name("value")
            .map_or("", |m| trim_quotes(m.as_str()));

        match name {
            "from" => authors.push(value.to_string()),
            "has" if value == "link" => predicates.push(Predicate::Link),
            "in" => channels.push(value.to_string()),
            "is" => predicates.push(Predicate::flags(value)),
            "regex" => predicates.push(Predicate::regex(value, true)),
            _ => predicates.push(Predicate::substring(token)),
        }
    }

    if !authors.is_empty() {
        predicates.push(Predicate::Author(authors));
    }

    if !channels.is_empty() {
        predicates.push(Predicate::Channel(channels));
    }

    predicates
}

fn trim_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);

    value.strip_suffix('"').unwrap_or(value)
}
