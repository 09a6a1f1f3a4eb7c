use tracing::debug;

use crate::{
    domain::{Deal, DealDraft, DealId, DealPatch, DealStage},
    error::{Result, SprintdeckError},
    storage::Storage,
};

use super::Store;

impl<S: Storage> Store<S> {
    /// Creates a deal. New deals enter the pipeline as leads unless the
    /// draft says otherwise.
    pub async fn create_deal(&mut self, draft: DealDraft) -> Result<Deal> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(SprintdeckError::EmptyTitle);
        }

        let mut deal = Deal::new(DealId::generate(), title);
        deal.contact = draft.contact;
        deal.value_cents = draft.value_cents;
        deal.notes = draft.notes;
        if let Some(stage) = draft.stage {
            deal.stage = stage;
        }

        debug!(deal = %deal.id, title = %deal.title, "created deal");
        self.state.deals.push(deal.clone());
        self.persist().await?;
        Ok(deal)
    }

    pub async fn update_deal(&mut self, id: &DealId, patch: DealPatch) -> Result<Deal> {
        let deal = self
            .state
            .deals
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| SprintdeckError::DealNotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            deal.title = title;
        }
        if let Some(contact) = patch.contact {
            deal.contact = contact;
        }
        if let Some(value_cents) = patch.value_cents {
            deal.value_cents = value_cents;
        }
        if let Some(stage) = patch.stage {
            deal.stage = stage;
        }
        if let Some(notes) = patch.notes {
            deal.notes = notes;
        }
        deal.touch();

        let deal = deal.clone();
        self.persist().await?;
        Ok(deal)
    }

    pub async fn delete_deal(&mut self, id: &DealId) -> Result<()> {
        if !self.state.deals.iter().any(|d| &d.id == id) {
            return Err(SprintdeckError::DealNotFound(id.to_string()));
        }
        self.state.deals.retain(|d| &d.id != id);

        debug!(deal = %id, "deleted deal");
        self.persist().await?;
        Ok(())
    }

    /// Drags a deal to another pipeline stage
    pub async fn move_deal_to_stage(&mut self, id: &DealId, stage: DealStage) -> Result<Deal> {
        let deal = self
            .state
            .deals
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| SprintdeckError::DealNotFound(id.to_string()))?;

        deal.stage = stage;
        deal.touch();
        let deal = deal.clone();

        debug!(deal = %deal.id, stage = %deal.stage, "moved deal");
        self.persist().await?;
        Ok(deal)
    }

    pub fn deal(&self, id: &DealId) -> Option<&Deal> {
        self.state.deals.iter().find(|d| &d.id == id)
    }

    pub fn deals(&self) -> &[Deal] {
        &self.state.deals
    }

    /// Deals sitting in one stage column, in creation order
    pub fn deals_by_stage(&self, stage: DealStage) -> Vec<&Deal> {
        self.state.deals.iter().filter(|d| d.stage == stage).collect()
    }
}
