//! Suspension prompts and the choices that answer them.
//!
//! An interactive executor that needs input returns an `ActionRequired`.
//! It carries everything the input layer (a UI or an AI) needs to produce a
//! legal `Choice`: who acts, which card asked, and the filter or candidate
//! list the answer must satisfy. The engine re-validates every answer, so a
//! caller cannot smuggle in an illegal target.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, PlayerId};
use crate::effects::{EffectDefinition, PlayDestination, ShiftDestination, TargetFilter, TargetScope};

/// The single outstanding request for input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequired {
    /// Player who must answer.
    pub actor: PlayerId,

    /// Card whose effect is asking.
    pub source_card: CardId,

    /// Lane of the source card.
    pub lane: usize,

    /// The actor may answer `Choice::Skip`.
    pub optional: bool,

    /// Effect that will follow this one, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<Box<EffectDefinition>>,

    pub kind: PromptKind,
}

impl ActionRequired {
    /// Check if `Choice::Skip` is acceptable.
    #[must_use]
    pub fn can_skip(&self) -> bool {
        self.optional
            || matches!(self.kind, PromptKind::SelectHandCards { min: 0, .. })
    }
}

/// Why a board card is being picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardPurpose {
    Flip,
    Shift,
    Delete,
    Return,
    Reveal,
}

impl BoardPurpose {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Flip => "card to flip",
            Self::Shift => "card to shift",
            Self::Delete => "card to delete",
            Self::Return => "card to return",
            Self::Reveal => "card to reveal",
        }
    }
}

/// Why a lane is being picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "purpose", rename_all = "snake_case")]
pub enum LanePurpose {
    /// Delete every matching card in the lane (both sides).
    DeleteAll { filter: TargetFilter },
    /// Play the top card of the actor's deck into the lane.
    PlayFromDeck { face_down: bool },
}

/// Why hand cards are being picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "purpose", rename_all = "snake_case")]
pub enum HandPurpose {
    Discard,
    Give,
    Reveal,
    Play {
        face_down: bool,
        destination: PlayDestination,
    },
}

impl HandPurpose {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Discard => "cards to discard",
            Self::Give => "cards to give",
            Self::Reveal => "cards to reveal",
            Self::Play { .. } => "card to play",
        }
    }
}

/// What kind of input is needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptKind {
    /// Pick a board card matching `filter` within `scope`.
    SelectBoardCard {
        purpose: BoardPurpose,
        filter: TargetFilter,
        scope: TargetScope,
        /// Picks left, including this one.
        remaining: u32,
        /// Cards already picked by this effect.
        #[serde(default)]
        chosen: SmallVec<[CardId; 4]>,
        /// Destination rule when `purpose` is shift.
        #[serde(default)]
        destination: Option<ShiftDestination>,
    },
    /// Pick the lane a card shifts to.
    SelectShiftLane {
        card: CardId,
        candidates: SmallVec<[usize; 3]>,
    },
    /// Pick a lane index.
    SelectLane {
        purpose: LanePurpose,
        candidates: SmallVec<[usize; 3]>,
    },
    /// Pick between `min` and `max` cards from the actor's hand.
    SelectHandCards {
        purpose: HandPurpose,
        min: u32,
        max: u32,
    },
    /// Pick the lane a card from hand is played to.
    SelectPlayLane {
        card: CardId,
        face_down: bool,
        candidates: SmallVec<[usize; 3]>,
    },
    /// Pick a card from the opponent's hand.
    SelectOpponentHandCard {
        remaining: u32,
    },
    /// Submit a new order for `target`'s protocols.
    RearrangeProtocols {
        target: PlayerId,
    },
    /// Pick two of `target`'s lanes to swap protocols between.
    SwapProtocols {
        target: PlayerId,
    },
    /// Pick one of several effects.
    ChooseOption {
        options: Vec<EffectDefinition>,
    },
}

impl PromptKind {
    /// Short tag for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectBoardCard { .. } => "select_board_card",
            Self::SelectShiftLane { .. } => "select_shift_lane",
            Self::SelectLane { .. } => "select_lane",
            Self::SelectHandCards { .. } => "select_hand_cards",
            Self::SelectPlayLane { .. } => "select_play_lane",
            Self::SelectOpponentHandCard { .. } => "select_opponent_hand_card",
            Self::RearrangeProtocols { .. } => "rearrange_protocols",
            Self::SwapProtocols { .. } => "swap_protocols",
            Self::ChooseOption { .. } => "choose_option",
        }
    }
}

/// An answer to an `ActionRequired`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", content = "value", rename_all = "snake_case")]
pub enum Choice {
    /// Decline an optional prompt (or stop a multi-pick early).
    Skip,
    Card(CardId),
    Cards(Vec<CardId>),
    Lane(usize),
    OptionIndex(usize),
    /// New protocol order, lane 0 first.
    ProtocolOrder(Vec<String>),
    /// Two lane indices.
    SwapLanes(usize, usize),
}
