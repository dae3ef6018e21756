//! Quick action catalog and dispatch.

use concierge_core::config::ChatConfig;
use concierge_core::QuickAction;

use crate::error::ChatError;

/// How a clicked quick action is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// Send the label through the intent router.
    Route(&'a str),
    /// Post the label and answer with the help reply directly.
    DirectHelp(&'a str),
}

/// Static list of one-click intent triggers.
#[derive(Debug, Clone)]
pub struct QuickActionCatalog {
    actions: Vec<QuickAction>,
    help_id: String,
}

impl Default for QuickActionCatalog {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

impl QuickActionCatalog {
    pub fn new(actions: Vec<QuickAction>, help_id: impl Into<String>) -> Self {
        Self {
            actions,
            help_id: help_id.into(),
        }
    }

    pub fn from_config(chat: &ChatConfig) -> Self {
        Self::new(chat.quick_actions.clone(), chat.help_action_id.clone())
    }

    pub fn actions(&self) -> &[QuickAction] {
        &self.actions
    }

    pub fn find(&self, id: &str) -> Option<&QuickAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Resolve a clicked action id.
    pub fn dispatch(&self, id: &str) -> Result<Dispatch<'_>, ChatError> {
        let action = self
            .find(id)
            .ok_or_else(|| ChatError::UnknownQuickAction(id.to_string()))?;
        if action.id == self.help_id {
            Ok(Dispatch::DirectHelp(&action.label))
        } else {
            Ok(Dispatch::Route(&action.label))
        }
    }
}
