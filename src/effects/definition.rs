//! Effect definitions: the declarative vocabulary cards are written in.
//!
//! An `EffectDefinition` pairs one `EffectAction` (what happens) with a
//! trigger (when it happens), an optional flag ("you may") and an optional
//! conditional follow-up. Every action kind is its own variant with only its
//! own parameters, so the executor dispatcher can match exhaustively.
//!
//! ## Wire format
//!
//! Definitions are authored as JSON records:
//!
//! ```
//! use compile_ccg::effects::{EffectAction, EffectDefinition, EffectTrigger};
//!
//! let json = r#"{
//!     "params": { "action": "draw", "count": { "type": "fixed", "value": 2 } },
//!     "trigger": "start"
//! }"#;
//!
//! let def: EffectDefinition = serde_json::from_str(json).unwrap();
//! assert!(matches!(def.params, EffectAction::Draw(_)));
//! assert_eq!(def.trigger, EffectTrigger::Start);
//! assert!(!def.optional);
//! ```
//!
//! Unknown `action` tags deserialize to `EffectAction::Unknown`, which the
//! scheduler treats as a logged no-op.

use serde::{Deserialize, Serialize};

use super::count::CountSpec;
use super::modifiers::{PassiveRule, ValueModifier};
use super::targeting::{TargetFilter, TargetScope};

/// A single card ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// The action and its parameters.
    pub params: EffectAction,

    /// When the effect fires.
    #[serde(default)]
    pub trigger: EffectTrigger,

    /// "You may": the acting player can decline, and the effect is silently
    /// skipped when it has nothing to act on.
    #[serde(default)]
    pub optional: bool,

    /// Follow-up scheduled after this effect completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Conditional>,
}

impl EffectDefinition {
    /// Create an on-play, mandatory definition.
    #[must_use]
    pub fn new(params: EffectAction) -> Self {
        Self {
            params,
            trigger: EffectTrigger::OnPlay,
            optional: false,
            conditional: None,
        }
    }

    /// Set the trigger (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, trigger: EffectTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Mark as optional (builder pattern).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Schedule `next` unconditionally after this effect.
    #[must_use]
    pub fn then(mut self, next: EffectDefinition) -> Self {
        self.conditional = Some(Conditional::new(ConditionalKind::Then, next));
        self
    }

    /// Schedule `next` only if this effect actually did something.
    #[must_use]
    pub fn if_executed(mut self, next: EffectDefinition) -> Self {
        self.conditional = Some(Conditional::new(ConditionalKind::IfExecuted, next));
        self
    }

    /// Short action name, used in log lines.
    #[must_use]
    pub fn action_name(&self) -> &'static str {
        self.params.name()
    }
}

/// How a follow-up is gated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalKind {
    /// Always runs after the current effect.
    Then,
    /// Runs only if the current effect executed.
    IfExecuted,
}

/// A follow-up effect attached to a definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditional {
    #[serde(rename = "type")]
    pub kind: ConditionalKind,
    pub then_effect: Box<EffectDefinition>,
}

impl Conditional {
    #[must_use]
    pub fn new(kind: ConditionalKind, then_effect: EffectDefinition) -> Self {
        Self {
            kind,
            then_effect: Box::new(then_effect),
        }
    }
}

/// When an effect fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTrigger {
    /// When the card is played face up or flipped face up.
    #[default]
    OnPlay,
    /// Start of its owner's turn.
    Start,
    /// End of its owner's turn.
    End,
    /// When the card gets covered.
    OnCover,
    /// Always in effect while active (modifiers and rules).
    Passive,
    AfterDraw,
    AfterOpponentDraw,
    AfterDiscard,
    AfterOpponentDiscard,
    AfterDelete,
    AfterFlip,
    AfterShift,
    AfterOpponentPlay,
    AfterClearCache,
}

impl EffectTrigger {
    /// Check if this trigger reacts to another action.
    #[must_use]
    pub const fn is_reactive(self) -> bool {
        !matches!(
            self,
            Self::OnPlay | Self::Start | Self::End | Self::OnCover | Self::Passive
        )
    }
}

/// Which side of the board an action applies to, relative to the card's
/// owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Own,
    Opponent,
}

/// An action with its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EffectAction {
    Draw(DrawParams),
    Flip(FlipParams),
    Shift(ShiftParams),
    Delete(DeleteParams),
    Discard(DiscardParams),
    Return(ReturnParams),
    Play(PlayParams),
    Reveal(RevealParams),
    Give(GiveParams),
    Take(TakeParams),
    RearrangeProtocols(ProtocolParams),
    SwapProtocols(ProtocolParams),
    ValueModifier(ValueModifierParams),
    PassiveRule(PassiveRuleParams),
    Choice(ChoiceParams),
    /// Any action tag this engine does not know.
    #[serde(other)]
    Unknown,
}

impl EffectAction {
    /// The action tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draw(_) => "draw",
            Self::Flip(_) => "flip",
            Self::Shift(_) => "shift",
            Self::Delete(_) => "delete",
            Self::Discard(_) => "discard",
            Self::Return(_) => "return",
            Self::Play(_) => "play",
            Self::Reveal(_) => "reveal",
            Self::Give(_) => "give",
            Self::Take(_) => "take",
            Self::RearrangeProtocols(_) => "rearrange_protocols",
            Self::SwapProtocols(_) => "swap_protocols",
            Self::ValueModifier(_) => "value_modifier",
            Self::PassiveRule(_) => "passive_rule",
            Self::Choice(_) => "choice",
            Self::Unknown => "unknown",
        }
    }
}

// === Parameters ===

/// Draw cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawParams {
    /// Defaults to 1 when absent.
    pub count: Option<CountSpec>,
    /// Who draws.
    pub target: Side,
}

/// Flip cards face up or face down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipParams {
    pub filter: TargetFilter,
    pub count: Option<CountSpec>,
    /// Flip the source card itself, no targeting.
    pub target_self: bool,
    pub scope: TargetScope,
    /// Flip every matching card.
    pub all: bool,
}

/// Where a shifted card may go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftDestination {
    /// Any lane other than the one the card is in.
    #[default]
    AnyOtherLane,
    /// The lane of the card that owns the effect.
    SourceLane,
}

/// Move a card to another lane on the same side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftParams {
    pub filter: TargetFilter,
    pub target_self: bool,
    pub scope: TargetScope,
    pub destination: ShiftDestination,
}

/// Delete cards (board to discard).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteParams {
    pub filter: TargetFilter,
    pub count: Option<CountSpec>,
    pub target_self: bool,
    pub scope: TargetScope,
    /// Pick a lane and delete every matching card in it on both sides.
    pub lane_wide: bool,
    pub all: bool,
}

/// Return cards from the board to their owner's hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnParams {
    pub filter: TargetFilter,
    pub count: Option<CountSpec>,
    pub target_self: bool,
    pub scope: TargetScope,
    pub all: bool,
}

/// Discard cards from hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscardParams {
    pub count: Option<CountSpec>,
    /// Who discards.
    pub actor: Side,
    /// "Discard up to N": zero is a legal selection.
    pub up_to: bool,
    /// Discard the entire hand.
    pub all: bool,
}

/// Where a played card comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaySource {
    #[default]
    Hand,
    /// Top of the deck.
    Deck,
}

/// Where a played card may go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayDestination {
    #[default]
    AnyLane,
    /// Any lane except the source lane.
    OtherLanes,
    /// One card into each lane except the source lane.
    EachOtherLane,
    SourceLane,
}

/// Play a card as part of an effect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayParams {
    pub source: PlaySource,
    pub face_down: bool,
    pub destination: PlayDestination,
    /// Who plays.
    pub actor: Side,
}

/// What a reveal looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum RevealSource {
    /// Reveal cards from your own hand.
    #[default]
    OwnHand,
    /// Your opponent reveals their hand.
    OpponentHand,
    /// Reveal a face-down board card.
    FaceDownCard {
        #[serde(default)]
        filter: TargetFilter,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealParams {
    pub source: RevealSource,
    pub count: Option<CountSpec>,
}

/// Give cards from your hand to your opponent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiveParams {
    pub count: Option<CountSpec>,
}

/// Take cards from your opponent's hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeParams {
    pub count: Option<CountSpec>,
    /// Take at random instead of choosing.
    pub random: bool,
}

/// Rearrange or swap a side's protocols.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    pub target: Side,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueModifierParams {
    pub modifier: ValueModifier,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveRuleParams {
    pub rule: PassiveRule,
}

/// Pick one of several effects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceParams {
    pub options: Vec<EffectDefinition>,
}
