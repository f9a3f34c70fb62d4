use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The comparison applied by a lookup, written as the last `__` segment of the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Fulltext,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IExact => "iexact",
            Self::Contains => "contains",
            Self::IContains => "icontains",
            Self::StartsWith => "startswith",
            Self::IStartsWith => "istartswith",
            Self::EndsWith => "endswith",
            Self::IEndsWith => "iendswith",
            Self::Fulltext => "fulltext",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
        }
    }

    /// Whether the lookup contributes to relevance scoring instead of only filtering.
    pub fn is_scored(self) -> bool {
        self == Self::Fulltext
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "exact" => Self::Exact,
            "iexact" => Self::IExact,
            "contains" => Self::Contains,
            "icontains" => Self::IContains,
            "startswith" => Self::StartsWith,
            "istartswith" => Self::IStartsWith,
            "endswith" => Self::EndsWith,
            "iendswith" => Self::IEndsWith,
            "fulltext" => Self::Fulltext,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "in" => Self::In,
            _ => return Err(()),
        })
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed lookup such as `title__cs__fulltext`.
///
/// Segments are separated by `__`, `.` or `@` (`title@cs` addresses the Czech variant of `title`).
/// The last segment is an operator if it names one and is not the only segment. The remaining
/// segments form the field path: a `prefix` followed by the field `name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupPath {
    segments: Vec<String>,
    operator: Option<Operator>,
}

impl LookupPath {
    pub fn parse(lookup: &str) -> Self {
        let mut raw: Vec<&str> = lookup.split("__").collect();
        // reserved names such as `__all` keep their leading underscores
        let mut leading = None;
        if raw.len() > 1 && raw[0].is_empty() {
            raw.remove(0);
            leading = Some("__");
        }
        let mut segments: Vec<String> = raw
            .iter()
            .flat_map(|segment| segment.split(['.', '@']))
            .map(str::to_owned)
            .collect();
        if let (Some(leading), Some(first)) = (leading, segments.first_mut()) {
            first.insert_str(0, leading);
        }

        let mut operator = None;
        if segments.len() > 1 {
            if let Some(last) = segments.last().and_then(|last| last.parse().ok()) {
                operator = Some(last);
                segments.pop();
            }
        }
        Self { segments, operator }
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// The segments before the field name. Empty for top-level fields.
    pub fn prefix(&self) -> &[String] {
        self.segments
            .split_last()
            .map(|(_, prefix)| prefix)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The field path joined by `.`, e.g. `title.cs`.
    pub fn field(&self) -> String {
        self.segments.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_field() {
        let path = LookupPath::parse("title");
        assert_eq!(path.operator(), None);
        assert!(path.prefix().is_empty());
        assert_eq!(path.name(), "title");
    }

    #[test]
    fn field_with_operator() {
        let path = LookupPath::parse("creator__fulltext");
        assert_eq!(path.operator(), Some(Operator::Fulltext));
        assert_eq!(path.field(), "creator");
    }

    #[test]
    fn language_variant_with_operator() {
        for lookup in ["title__cs__exact", "title.cs__exact", "title@cs__exact"] {
            let path = LookupPath::parse(lookup);
            assert_eq!(path.operator(), Some(Operator::Exact), "{lookup}");
            assert_eq!(path.prefix(), ["title"], "{lookup}");
            assert_eq!(path.name(), "cs", "{lookup}");
            assert_eq!(path.field(), "title.cs", "{lookup}");
        }
    }

    #[test]
    fn field_named_like_operator() {
        let path = LookupPath::parse("in");
        assert_eq!(path.operator(), None);
        assert_eq!(path.name(), "in");
    }

    #[test]
    fn reserved_names() {
        let path = LookupPath::parse("_fedoralink_model__exact");
        assert_eq!(path.field(), "_fedoralink_model");
        assert_eq!(path.operator(), Some(Operator::Exact));

        let path = LookupPath::parse("__all__fulltext");
        assert_eq!(path.field(), "__all");
        assert_eq!(path.operator(), Some(Operator::Fulltext));
    }
}
