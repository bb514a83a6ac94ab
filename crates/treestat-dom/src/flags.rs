//! Parser-behavior flags.
//!
//! The tree builder marks a node whenever it applied one of the error
//! recovery rules from [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//! while creating or moving it. The flags are independent: a node that was
//! cloned by the adoption agency and then foster parented carries both.

use strum_macros::{Display, EnumIter};

/// One parser-behavior marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ParseFlag {
    /// The element had no start tag in the source; the parser created it
    /// (implied `html`, `head`, `body`, `tbody`, `tr`, `colgroup`, or the `p`
    /// made for a stray `</p>`).
    ParserInserted,
    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    /// "Create: Insert an HTML element for the token for which the element
    /// entry was created, to obtain new element."
    ReconstructedFormattingElement,
    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    /// "Create an element for the token for which the element node was
    /// created..."
    AdoptionAgencyCloned,
    /// The adoption agency re-parented this node.
    AdoptionAgencyMoved,
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    /// Inserted at a foster-parent location instead of the current node.
    FosterParented,
}

/// The set of [`ParseFlag`]s applied to one node.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseFlags {
    /// See [`ParseFlag::ParserInserted`].
    pub parser_inserted: bool,
    /// See [`ParseFlag::ReconstructedFormattingElement`].
    pub reconstructed_formatting_element: bool,
    /// See [`ParseFlag::AdoptionAgencyCloned`].
    pub adoption_agency_cloned: bool,
    /// See [`ParseFlag::AdoptionAgencyMoved`].
    pub adoption_agency_moved: bool,
    /// See [`ParseFlag::FosterParented`].
    pub foster_parented: bool,
}

impl ParseFlags {
    /// No flags set.
    pub const NONE: Self = Self {
        parser_inserted: false,
        reconstructed_formatting_element: false,
        adoption_agency_cloned: false,
        adoption_agency_moved: false,
        foster_parented: false,
    };

    /// A set holding exactly `flag`.
    #[must_use]
    pub const fn only(flag: ParseFlag) -> Self {
        let mut flags = Self::NONE;
        flags.insert(flag);
        flags
    }

    /// Whether `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: ParseFlag) -> bool {
        match flag {
            ParseFlag::ParserInserted => self.parser_inserted,
            ParseFlag::ReconstructedFormattingElement => self.reconstructed_formatting_element,
            ParseFlag::AdoptionAgencyCloned => self.adoption_agency_cloned,
            ParseFlag::AdoptionAgencyMoved => self.adoption_agency_moved,
            ParseFlag::FosterParented => self.foster_parented,
        }
    }

    /// Set `flag`.
    pub const fn insert(&mut self, flag: ParseFlag) {
        match flag {
            ParseFlag::ParserInserted => self.parser_inserted = true,
            ParseFlag::ReconstructedFormattingElement => {
                self.reconstructed_formatting_element = true;
            }
            ParseFlag::AdoptionAgencyCloned => self.adoption_agency_cloned = true,
            ParseFlag::AdoptionAgencyMoved => self.adoption_agency_moved = true,
            ParseFlag::FosterParented => self.foster_parented = true,
        }
    }

    /// True when no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.parser_inserted
            || self.reconstructed_formatting_element
            || self.adoption_agency_cloned
            || self.adoption_agency_moved
            || self.foster_parented)
    }

    /// Iterate over the flags that are set.
    pub fn iter(self) -> impl Iterator<Item = ParseFlag> {
        use strum::IntoEnumIterator;
        ParseFlag::iter().filter(move |flag| self.contains(*flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        let mut flags = ParseFlags::only(ParseFlag::AdoptionAgencyCloned);
        flags.insert(ParseFlag::FosterParented);

        assert!(flags.contains(ParseFlag::AdoptionAgencyCloned));
        assert!(flags.contains(ParseFlag::FosterParented));
        assert!(!flags.contains(ParseFlag::ParserInserted));
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            vec![ParseFlag::AdoptionAgencyCloned, ParseFlag::FosterParented]
        );
    }

    #[test]
    fn test_empty_set() {
        assert!(ParseFlags::default().is_empty());
        assert_eq!(ParseFlags::NONE.iter().count(), 0);
        assert!(!ParseFlags::only(ParseFlag::ParserInserted).is_empty());
    }

    #[test]
    fn test_flag_display_names() {
        assert_eq!(ParseFlag::ParserInserted.to_string(), "parser_inserted");
        assert_eq!(
            ParseFlag::ReconstructedFormattingElement.to_string(),
            "reconstructed_formatting_element"
        );
    }
}
