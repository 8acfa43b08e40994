use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

use statusbot_common::error::BoardError;
use statusbot_common::models::binding::DisplayBinding;

use crate::status::board::{BoardSession, StatusBoard, UpsertOutcome};
use crate::status::presenter::StatusPresenter;
use crate::status::source::StatusSource;

/// What started a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Timer,
    Command,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshTrigger::Timer => f.write_str("timer"),
            RefreshTrigger::Command => f.write_str("command"),
        }
    }
}

/// Runs the fetch -> render -> upsert cycle against the single status board.
///
/// The board session is held for the whole cycle, so cycles started by the
/// timer and by the slash command are strictly serialized.
pub struct StatusService {
    source: Arc<dyn StatusSource>,
    presenter: StatusPresenter,
    board: StatusBoard,
}

impl StatusService {
    pub fn new(source: Arc<dyn StatusSource>, presenter: StatusPresenter, board: StatusBoard) -> Self {
        Self {
            source,
            presenter,
            board,
        }
    }

    pub async fn binding(&self) -> DisplayBinding {
        self.board.snapshot().await
    }

    /// One full refresh. Upstream failures are rendered into the message; only
    /// a board failure is returned.
    pub async fn run_cycle(&self, trigger: RefreshTrigger) -> Result<UpsertOutcome, BoardError> {
        let mut session = self.board.session().await;
        self.cycle(&mut session, trigger).await
    }

    /// Command path: optionally retarget the board, then refresh, all under
    /// one session. Returns the channel the status is bound to.
    pub async fn select_and_refresh(
        &self,
        channel: Option<Id<ChannelMarker>>,
    ) -> Result<Id<ChannelMarker>, (Id<ChannelMarker>, BoardError)> {
        let mut session = self.board.session().await;
        if let Some(channel) = channel {
            session.redirect(channel);
        }

        let bound = session.binding().channel_id();
        match self.cycle(&mut session, RefreshTrigger::Command).await {
            Ok(_) => Ok(bound),
            Err(e) => Err((bound, e)),
        }
    }

    async fn cycle(
        &self,
        session: &mut BoardSession<'_>,
        trigger: RefreshTrigger,
    ) -> Result<UpsertOutcome, BoardError> {
        debug!("Status refresh ({trigger}) starting");

        let summary = self.source.fetch().await;
        if let Err(e) = &summary {
            warn!("Status fetch failed ({trigger}), rendering error placeholders: {e}");
        }

        let message = self.presenter.render(&summary);
        match session.upsert(&message).await {
            Ok(outcome) => {
                info!("Status refresh ({trigger}) complete: {outcome:?}");
                Ok(outcome)
            }
            Err(e) => {
                error!("Status refresh ({trigger}) failed: {e}");
                Err(e)
            }
        }
    }
}
