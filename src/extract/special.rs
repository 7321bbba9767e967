//! Characters and instructions that are isolated as placeholder codes
//! instead of being left in the extracted text.

use crate::markup::Instruction;

/// Space, hyphen and joiner characters with layout meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialCharacterKind {
    NonBreakingSpace,
    FixedWidthNonBreakingSpace,
    FlushSpace,
    EnSpace,
    EmSpace,
    ThirdSpace,
    QuarterSpace,
    SixthSpace,
    FigureSpace,
    PunctuationSpace,
    ThinSpace,
    HairSpace,
    DiscretionaryLineBreak,
    ZeroWidthNonJoiner,
    ZeroWidthJoiner,
    NonBreakingHyphen,
    ForcedLineBreak,
    DiscretionaryHyphen,
}

impl SpecialCharacterKind {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '\u{00A0}' => SpecialCharacterKind::NonBreakingSpace,
            '\u{202F}' => SpecialCharacterKind::FixedWidthNonBreakingSpace,
            '\u{2001}' => SpecialCharacterKind::FlushSpace,
            '\u{2002}' => SpecialCharacterKind::EnSpace,
            '\u{2003}' => SpecialCharacterKind::EmSpace,
            '\u{2004}' => SpecialCharacterKind::ThirdSpace,
            '\u{2005}' => SpecialCharacterKind::QuarterSpace,
            '\u{2006}' => SpecialCharacterKind::SixthSpace,
            '\u{2007}' => SpecialCharacterKind::FigureSpace,
            '\u{2008}' => SpecialCharacterKind::PunctuationSpace,
            '\u{2009}' => SpecialCharacterKind::ThinSpace,
            '\u{200A}' => SpecialCharacterKind::HairSpace,
            '\u{200B}' => SpecialCharacterKind::DiscretionaryLineBreak,
            '\u{200C}' => SpecialCharacterKind::ZeroWidthNonJoiner,
            '\u{200D}' => SpecialCharacterKind::ZeroWidthJoiner,
            '\u{2011}' => SpecialCharacterKind::NonBreakingHyphen,
            '\u{2028}' => SpecialCharacterKind::ForcedLineBreak,
            '\u{00AD}' => SpecialCharacterKind::DiscretionaryHyphen,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            SpecialCharacterKind::NonBreakingSpace => '\u{00A0}',
            SpecialCharacterKind::FixedWidthNonBreakingSpace => '\u{202F}',
            SpecialCharacterKind::FlushSpace => '\u{2001}',
            SpecialCharacterKind::EnSpace => '\u{2002}',
            SpecialCharacterKind::EmSpace => '\u{2003}',
            SpecialCharacterKind::ThirdSpace => '\u{2004}',
            SpecialCharacterKind::QuarterSpace => '\u{2005}',
            SpecialCharacterKind::SixthSpace => '\u{2006}',
            SpecialCharacterKind::FigureSpace => '\u{2007}',
            SpecialCharacterKind::PunctuationSpace => '\u{2008}',
            SpecialCharacterKind::ThinSpace => '\u{2009}',
            SpecialCharacterKind::HairSpace => '\u{200A}',
            SpecialCharacterKind::DiscretionaryLineBreak => '\u{200B}',
            SpecialCharacterKind::ZeroWidthNonJoiner => '\u{200C}',
            SpecialCharacterKind::ZeroWidthJoiner => '\u{200D}',
            SpecialCharacterKind::NonBreakingHyphen => '\u{2011}',
            SpecialCharacterKind::ForcedLineBreak => '\u{2028}',
            SpecialCharacterKind::DiscretionaryHyphen => '\u{00AD}',
        }
    }

    /// Suffix of the `x-` code type.
    pub fn name(self) -> &'static str {
        match self {
            SpecialCharacterKind::NonBreakingSpace => "nonbreaking-space",
            SpecialCharacterKind::FixedWidthNonBreakingSpace => "fixed-width-nonbreaking-space",
            SpecialCharacterKind::FlushSpace => "flush-space",
            SpecialCharacterKind::EnSpace => "en-space",
            SpecialCharacterKind::EmSpace => "em-space",
            SpecialCharacterKind::ThirdSpace => "third-space",
            SpecialCharacterKind::QuarterSpace => "quarter-space",
            SpecialCharacterKind::SixthSpace => "sixth-space",
            SpecialCharacterKind::FigureSpace => "figure-space",
            SpecialCharacterKind::PunctuationSpace => "punctuation-space",
            SpecialCharacterKind::ThinSpace => "thin-space",
            SpecialCharacterKind::HairSpace => "hair-space",
            SpecialCharacterKind::DiscretionaryLineBreak => "discretionary-line-break",
            SpecialCharacterKind::ZeroWidthNonJoiner => "zero-width-non-joiner",
            SpecialCharacterKind::ZeroWidthJoiner => "zero-width-joiner",
            SpecialCharacterKind::NonBreakingHyphen => "nonbreaking-hyphen",
            SpecialCharacterKind::ForcedLineBreak => "forced-line-break",
            SpecialCharacterKind::DiscretionaryHyphen => "discretionary-hyphen",
        }
    }
}

/// Known `<?ACE n?>` instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    EndNestedStyle,
    FootnoteNumber,
    IndentToHere,
    RightIndentTab,
    AutoPageNumber,
    SectionMarker,
    /// Any other instruction; kept verbatim with a neutral code type.
    Other,
}

const ACE: &str = "ACE";

impl InstructionKind {
    pub fn from_instruction(instruction: &Instruction) -> Self {
        if instruction.target != ACE {
            log::debug!("isolating non-ACE instruction <?{}?>", instruction.target);
            return InstructionKind::Other;
        }
        match instruction.data.trim().parse::<u32>() {
            Ok(3) => InstructionKind::EndNestedStyle,
            Ok(4) => InstructionKind::FootnoteNumber,
            Ok(7) => InstructionKind::IndentToHere,
            Ok(8) => InstructionKind::RightIndentTab,
            Ok(18) => InstructionKind::AutoPageNumber,
            Ok(19) => InstructionKind::SectionMarker,
            _ => {
                log::warn!("unknown ACE instruction code {:?}", instruction.data);
                InstructionKind::Other
            }
        }
    }

    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            InstructionKind::EndNestedStyle => "end-nested-style",
            InstructionKind::FootnoteNumber => "footnote-number",
            InstructionKind::IndentToHere => "indent-to-here",
            InstructionKind::RightIndentTab => "right-indent-tab",
            InstructionKind::AutoPageNumber => "auto-page-number",
            InstructionKind::SectionMarker => "section-marker",
            InstructionKind::Other => return None,
        })
    }
}

/// What a special-character placeholder stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCharacter {
    Character(SpecialCharacterKind),
    Instruction(Instruction),
}
