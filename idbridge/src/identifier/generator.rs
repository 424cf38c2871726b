//! Template-driven identifier generation.
//!
//! The template `10000000-1000-4000-8000-100000000000` marks every position
//! that needs a random digit with `0`, `1` or `8`. Each marker `c` is replaced
//! by `c ^ (r & (15 >> (c / 4)))` for a fresh random byte `r`:
//!
//! | marker | mask | possible digits |
//! |--------|------|-----------------|
//! | `0`    | 15   | `0`..=`f`       |
//! | `1`    | 15   | `0`..=`f`       |
//! | `8`    | 3    | `8 9 a b`       |
//!
//! The literal `4` and the hyphens are copied through, so the output always
//! carries version 4 and the RFC 4122 variant. Identifiers produced by this
//! mapping are already stored by hosts; the bit-level output must not change.

use super::entropy::{EntropySource, OsEntropy};
use super::{Identifier, IDENTIFIER_LEN};
use crate::errors::EntropyError;

/// The layout every identifier is rendered from.
pub const TEMPLATE: &str = "10000000-1000-4000-8000-100000000000";

/// Random bytes consumed per identifier, one per template marker.
pub const BYTES_PER_IDENTIFIER: usize = 31;

const HEX: [u8; 16] = *b"0123456789abcdef";

const fn is_marker(c: u8) -> bool {
    matches!(c, b'0' | b'1' | b'8')
}

/// Replaces one template marker using one random byte.
const fn substitute(marker: u8, random: u8) -> u8 {
    let digit = marker - b'0';
    let mask = 15u8 >> (digit / 4);
    HEX[(digit ^ (random & mask)) as usize]
}

/// Renders an identifier from exactly [`BYTES_PER_IDENTIFIER`] bytes.
///
/// Bytes are consumed left to right, one per marker in [`TEMPLATE`].
#[must_use]
pub fn render(random: &[u8; BYTES_PER_IDENTIFIER]) -> Identifier {
    let mut bytes = random.iter().copied();
    let mut out = String::with_capacity(IDENTIFIER_LEN);

    for c in TEMPLATE.bytes() {
        let rendered = if is_marker(c) {
            bytes.next().map_or(c, |r| substitute(c, r))
        } else {
            c
        };
        out.push(char::from(rendered));
    }

    Identifier::from_rendered(out)
}

/// Produces identifiers from an injected entropy source.
#[derive(Debug, Clone, Default)]
pub struct IdentifierGenerator<S = OsEntropy> {
    source: S,
}

impl IdentifierGenerator<OsEntropy> {
    /// Creates a generator backed by the operating system's secure source.
    #[must_use]
    pub const fn new() -> Self {
        Self { source: OsEntropy }
    }
}

impl<S: EntropySource> IdentifierGenerator<S> {
    /// Creates a generator that draws from `source`.
    #[must_use]
    pub const fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Returns the underlying source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Generates a fresh identifier.
    pub fn generate(&mut self) -> Result<Identifier, EntropyError> {
        let mut random = [0u8; BYTES_PER_IDENTIFIER];
        self.source.fill(&mut random)?;
        Ok(render(&random))
    }
}

/// Generates one identifier from the operating system's secure source.
pub fn generate_identifier() -> Result<Identifier, EntropyError> {
    IdentifierGenerator::new().generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::SequenceEntropy;
    use pretty_assertions::assert_eq;
    use regex::Regex;
    use std::collections::{BTreeSet, HashSet};

    fn layout() -> Regex {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
    }

    /// Every digit `substitute` can yield for the marker at `position`.
    fn reachable_digits(position: usize) -> BTreeSet<char> {
        let c = TEMPLATE.as_bytes()[position];
        if !is_marker(c) {
            return BTreeSet::from([char::from(c)]);
        }
        (0..=u8::MAX)
            .map(|r| char::from(substitute(c, r)))
            .collect()
    }

    #[test]
    fn test_template_shape() {
        assert_eq!(TEMPLATE.len(), IDENTIFIER_LEN);
        assert_eq!(
            TEMPLATE.bytes().filter(|c| is_marker(*c)).count(),
            BYTES_PER_IDENTIFIER
        );
    }

    #[test]
    fn test_generated_layout() {
        let pattern = layout();
        let mut generator = IdentifierGenerator::new();

        for _ in 0..1_000 {
            let id = generator.generate().unwrap();
            assert_eq!(id.as_str().len(), 36);
            assert!(pattern.is_match(id.as_str()), "bad layout: {id}");
            for (i, c) in id.as_str().char_indices() {
                assert_eq!(c == '-', [8, 13, 18, 23].contains(&i));
            }
        }
    }

    #[test]
    fn test_version_and_variant_digits_follow_mask() {
        let version = reachable_digits(14);
        let variant = reachable_digits(19);
        assert_eq!(version, BTreeSet::from(['4']));
        assert_eq!(variant, BTreeSet::from(['8', '9', 'a', 'b']));

        let mut generator = IdentifierGenerator::new();
        for _ in 0..1_000 {
            let id = generator.generate().unwrap();
            assert!(version.contains(&id.version_digit()));
            assert!(variant.contains(&id.variant_digit()));
        }
    }

    #[test]
    fn test_no_collisions_in_ten_thousand() {
        let mut generator = IdentifierGenerator::new();
        let mut seen = HashSet::new();

        for _ in 0..10_000 {
            let id = generator.generate().unwrap();
            assert!(seen.insert(id), "collision after {} samples", seen.len());
        }
    }

    #[test]
    fn test_fixed_bytes_are_reproducible() {
        let mut generator = IdentifierGenerator::with_source(SequenceEntropy::counting());
        assert_eq!(
            generator.generate().unwrap(),
            "11234567-99ab-4cde-b012-2456789abcde"
        );
        assert_eq!(generator.source().consumed(), BYTES_PER_IDENTIFIER);
    }

    #[test]
    fn test_render_pinned_outputs() {
        assert_eq!(
            render(&[0u8; BYTES_PER_IDENTIFIER]),
            "10000000-1000-4000-8000-100000000000"
        );
        assert_eq!(
            render(&[0xff; BYTES_PER_IDENTIFIER]),
            "efffffff-efff-4fff-bfff-efffffffffff"
        );

        let mut mixed = [0u8; BYTES_PER_IDENTIFIER];
        for (i, b) in mixed.iter_mut().enumerate() {
            *b = ((i * 37 + 11) % 256) as u8;
        }
        assert_eq!(render(&mixed), "a05af49e-28d2-47c1-ab05-bf49e38d27c1");
    }

    #[test]
    fn test_generation_propagates_entropy_failure() {
        let mut generator = IdentifierGenerator::with_source(SequenceEntropy::new(Vec::new()));
        assert!(generator.generate().is_err());
    }

    #[test]
    fn test_generate_identifier_convenience() {
        let id = generate_identifier().unwrap();
        assert!(layout().is_match(id.as_str()));
    }
}
