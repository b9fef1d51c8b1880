use std::fmt;

/// Monitoring-plugin severity. The variant order is the exit-code order,
/// so `Unknown` compares highest even though it only means "unclear".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Ok,
    #[allow(dead_code)]
    Warning,
    Critical,
    #[allow(dead_code)]
    Unknown,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok       => "OK",
            Severity::Warning  => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown  => "UNKNOWN",
        }
    }

    /// Process exit code expected by Nagios/Icinga.
    pub fn exit_code(&self) -> u8 {
        match self {
            Severity::Ok       => 0,
            Severity::Warning  => 1,
            Severity::Critical => 2,
            Severity::Unknown  => 3,
        }
    }

    /// Critical when `healthy` is false, Ok otherwise.
    pub fn from_health(healthy: bool) -> Self {
        if healthy { Severity::Ok } else { Severity::Critical }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Worst severity of the given ones; `Ok` for an empty input.
pub fn aggregate<I>(severities: I) -> Severity
where
    I: IntoIterator<Item = Severity>,
{
    severities.into_iter().max().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Severity; 4] = [Severity::Ok, Severity::Warning, Severity::Critical, Severity::Unknown];

    #[test]
    fn exit_codes_follow_plugin_convention() {
        let codes: Vec<u8> = ALL.iter().map(Severity::exit_code).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn unknown_orders_above_critical() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert!(Severity::Critical < Severity::Unknown);
    }

    #[test]
    fn aggregate_is_commutative_and_dominating() {
        for a in ALL {
            for b in ALL {
                let ab = aggregate([a, b]);
                assert_eq!(ab, aggregate([b, a]));
                assert!(ab >= a);
                assert!(ab >= b);
            }
        }
    }

    #[test]
    fn aggregate_is_associative() {
        for a in ALL {
            for b in ALL {
                for c in ALL {
                    let left  = aggregate([aggregate([a, b]), c]);
                    let right = aggregate([a, aggregate([b, c])]);
                    assert_eq!(left, right);
                    assert_eq!(left, aggregate([a, b, c]));
                }
            }
        }
    }

    #[test]
    fn aggregate_of_nothing_is_ok() {
        assert_eq!(aggregate(Vec::new()), Severity::Ok);
    }

    #[test]
    fn labels() {
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
        assert_eq!(Severity::from_health(false), Severity::Critical);
        assert_eq!(Severity::from_health(true), Severity::Ok);
    }
}
