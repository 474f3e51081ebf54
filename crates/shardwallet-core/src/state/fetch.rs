use tokio_util::sync::CancellationToken;

/// One kind of background read.
///
/// Restarting cancels the previous run and bumps the generation, so a run
/// that finishes late can tell it was superseded even if it never observed
/// its cancellation.
#[derive(Debug, Default)]
pub(crate) struct FetchSlot {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Handed to a spawned read; checked against the slot before publishing.
#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl FetchSlot {
    pub(crate) fn restart(&mut self, parent: &CancellationToken) -> Ticket {
        self.reset();
        let token = parent.child_token();
        self.token = Some(token.clone());
        Ticket {
            generation: self.generation,
            token,
        }
    }

    /// Cancel any run and invalidate outstanding tickets.
    pub(crate) fn reset(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    pub(crate) fn is_current(&self, ticket: &Ticket) -> bool {
        self.token.is_some() && self.generation == ticket.generation
    }

    /// Retire `ticket` if it is still current. Returns whether it was.
    pub(crate) fn finish(&mut self, ticket: &Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.token = None;
        true
    }
}
