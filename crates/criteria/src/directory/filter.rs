//! Directory filter tree.
//!
//! Directory filters are fully prefix-parenthesized, so the accumulator grows
//! the filter by wrapping: each restriction becomes a new group whose first
//! child is everything accumulated so far.

/// Group connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connective {
    And,
    Or,
}

impl Connective {
    fn prefix(self) -> &'static str {
        match self {
            Connective::And => "(&",
            Connective::Or => "(|",
        }
    }
}

/// Assertion operator supported by the directory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assertion {
    Equal,
    NotEqual,
    GreaterOrEqual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterNode {
    /// Object-class conjunction seeding every filter.
    ObjectClasses(Vec<String>),
    Compare {
        attribute: String,
        assertion: Assertion,
        value: String,
    },
    Group {
        connective: Connective,
        left: Box<FilterNode>,
        right: Box<FilterNode>,
    },
}

impl FilterNode {
    pub(crate) fn wrap(self, connective: Connective, right: FilterNode) -> FilterNode {
        FilterNode::Group {
            connective,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    pub(crate) fn render(&self, out: &mut String) {
        match self {
            FilterNode::ObjectClasses(classes) => {
                let wrapped = classes.len() > 1;
                if wrapped {
                    out.push_str("(&");
                }
                for class in classes {
                    out.push_str("(objectclass=");
                    out.push_str(&escape_value(class));
                    out.push(')');
                }
                if wrapped {
                    out.push(')');
                }
            }
            FilterNode::Compare {
                attribute,
                assertion,
                value,
            } => {
                out.push('(');
                if *assertion == Assertion::NotEqual {
                    out.push('!');
                }
                out.push_str(attribute);
                out.push_str(match assertion {
                    Assertion::Equal | Assertion::NotEqual => "=",
                    Assertion::GreaterOrEqual => ">=",
                });
                out.push_str(&escape_value(value));
                out.push(')');
            }
            FilterNode::Group {
                connective,
                left,
                right,
            } => {
                out.push_str(connective.prefix());
                left.render(out);
                right.render(out);
                out.push(')');
            }
        }
    }
}

/// Escape filter metacharacters (RFC 4515). `*` is left alone so it keeps
/// working as the substring wildcard.
pub(crate) fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\5c"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\0' => escaped.push_str("\\00"),
            other => escaped.push(other),
        }
    }
    escaped
}
