//! Per-format grammar tables.
//!
//! Every document flavor encodes the same begin/end/text event stream; the
//! grammar says which surface syntax carries the markers and which node
//! kinds the flavor may contain. A marker whose kind is not in the table is
//! ordinary text (a literal `[CrID:2]` inside a manuscript stays text).

use crate::novel::NodeKind;

/// Which surface syntax carries the structural markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSyntax {
    /// Markers on their own paragraphs: `[ChID:3]` … `[/ChID]`.
    /// Styled invisibly small on export, but recognized regardless of
    /// styling on import.
    BracketLine,
    /// Markers as division wrappers: `<div id="ChID:3">` … `</div>`.
    TaggedDivision,
}

/// The structural grammar of one document flavor.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub syntax: MarkerSyntax,
    /// Node kinds this flavor may contain, outermost first.
    pub kinds: &'static [NodeKind],
}

impl Grammar {
    pub fn accepts(&self, kind: NodeKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Manuscript and proof documents: chapters containing scene bodies.
pub const NARRATIVE: Grammar = Grammar {
    syntax: MarkerSyntax::BracketLine,
    kinds: &[NodeKind::Chapter, NodeKind::Scene],
};

/// Chapter description sheets.
pub const CHAPTER_SECTIONS: Grammar = Grammar {
    syntax: MarkerSyntax::TaggedDivision,
    kinds: &[NodeKind::Chapter],
};

/// Scene description sheets: scene divisions nested in chapter divisions.
pub const SCENE_SECTIONS: Grammar = Grammar {
    syntax: MarkerSyntax::TaggedDivision,
    kinds: &[NodeKind::Chapter, NodeKind::Scene],
};

/// Character description sheets.
pub const CHARACTER_SECTIONS: Grammar = Grammar {
    syntax: MarkerSyntax::TaggedDivision,
    kinds: &[NodeKind::Character],
};

/// Location description sheets.
pub const LOCATION_SECTIONS: Grammar = Grammar {
    syntax: MarkerSyntax::TaggedDivision,
    kinds: &[NodeKind::Location],
};

/// Item description sheets.
pub const ITEM_SECTIONS: Grammar = Grammar {
    syntax: MarkerSyntax::TaggedDivision,
    kinds: &[NodeKind::Item],
};
