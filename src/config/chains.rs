//! Command resolution chain configuration

use crate::action::LogicalAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host command identifiers to probe, per logical action
///
/// Keys are [`LogicalAction::id`] values. Host shells rename and retire
/// commands between versions, so each action lists several candidates in
/// preference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandChains {
    chains: BTreeMap<String, Vec<String>>,
}

fn default_chain(action: LogicalAction) -> &'static [&'static str] {
    match action {
        LogicalAction::SplitHorizontal => &[
            "workbench.action.splitEditorDown",
            "workbench.action.splitEditorOrthogonal",
            "workbench.action.splitEditor",
        ],
        LogicalAction::SplitVertical => &[
            "workbench.action.splitEditorRight",
            "workbench.action.splitEditor",
        ],
        LogicalAction::FocusLeft => &[
            "workbench.action.navigateLeft",
            "workbench.action.focusLeftGroup",
        ],
        LogicalAction::FocusRight => &[
            "workbench.action.navigateRight",
            "workbench.action.focusRightGroup",
        ],
        LogicalAction::FocusUp => &[
            "workbench.action.navigateUp",
            "workbench.action.focusAboveGroup",
        ],
        LogicalAction::FocusDown => &[
            "workbench.action.navigateDown",
            "workbench.action.focusBelowGroup",
        ],
        LogicalAction::ClosePane => &[
            "workbench.action.closeEditorsInGroup",
            "workbench.action.closeActiveEditor",
        ],
        LogicalAction::SaveLayoutProfile
        | LogicalAction::LoadLayoutProfile
        | LogicalAction::SetMode(_) => &[],
    }
}

impl Default for CommandChains {
    fn default() -> Self {
        let chains = LogicalAction::CHAINED
            .iter()
            .map(|&action| {
                let ids = default_chain(action)
                    .iter()
                    .map(|id| (*id).to_string())
                    .collect();
                (action.id().to_string(), ids)
            })
            .collect();
        Self { chains }
    }
}

impl CommandChains {
    /// An empty configuration with no chains at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            chains: BTreeMap::new(),
        }
    }

    /// The chain for `action`. Empty if the action has none.
    #[must_use]
    pub fn chain_for(&self, action: LogicalAction) -> &[String] {
        self.chains
            .get(action.id())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replace the chain for `action`.
    pub fn set_chain<I, S>(&mut self, action: LogicalAction, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chains.insert(
            action.id().to_string(),
            ids.into_iter().map(Into::into).collect(),
        );
    }

    /// Add default chains for actions missing from this configuration.
    ///
    /// Chains already present, even empty ones, are left alone.
    pub fn merge_defaults(&mut self) {
        let defaults = Self::default();
        for (action, ids) in defaults.chains {
            self.chains.entry(action).or_insert(ids);
        }
    }
}
