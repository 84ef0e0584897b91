//! Delivery destination built from routing segments.

use compact_str::CompactString;

/// Where an event should be delivered.
///
/// Wraps the three path segments of a relay route (`/relay/{a}/{b}/{c}`).
/// The segments are opaque: they are joined with `/` into the credential the
/// notifier hands to the destination, and it is up to that destination to
/// reject a malformed credential.
///
/// The credential is a secret (for Slack it *is* the webhook URL), so the
/// `Debug` and `Display` impls only show the first segment.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    segments: [CompactString; 3],
}

impl Destination {
    pub fn new(
        first: impl Into<CompactString>,
        second: impl Into<CompactString>,
        third: impl Into<CompactString>,
    ) -> Self {
        Self {
            segments: [first.into(), second.into(), third.into()],
        }
    }

    pub fn segments(&self) -> [&str; 3] {
        [
            self.segments[0].as_str(),
            self.segments[1].as_str(),
            self.segments[2].as_str(),
        ]
    }

    /// The segments joined with `/`.
    pub fn credential(&self) -> String {
        self.segments().join("/")
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/***", self.segments[0])
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Destination").field(&format_args!("{self}")).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_joins_segments() {
        let dest = Destination::new("T1", "T2", "T3");
        assert_eq!(dest.credential(), "T1/T2/T3");
        assert_eq!(dest.segments(), ["T1", "T2", "T3"]);
    }

    #[test]
    fn empty_segments_are_kept() {
        let dest = Destination::new("T1", "", "T3");
        assert_eq!(dest.credential(), "T1//T3");
    }

    #[test]
    fn formatting_redacts_secret_segments() {
        let dest = Destination::new("T1", "B2", "secret");
        assert_eq!(dest.to_string(), "T1/***");
        assert_eq!(format!("{dest:?}"), "Destination(T1/***)");
    }
}
