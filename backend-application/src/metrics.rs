use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    status_signals: AtomicU64,
    rfid_attaches: AtomicU64,
    rejected_transitions: AtomicU64,
    settlements_paid: AtomicU64,
    settlements_skipped: AtomicU64,
    tokens_paid: AtomicU64,
    transfers_completed: AtomicU64,
}

impl Metrics {
    pub fn record_status_signal(&self) {
        self.status_signals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rfid_attach(&self) {
        self.rfid_attaches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_transition(&self) {
        self.rejected_transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_settlement_paid(&self, amount: i64) {
        self.settlements_paid.fetch_add(1, Ordering::Relaxed);
        self.tokens_paid.fetch_add(amount as u64, Ordering::Relaxed);
    }

    /// Money silently not paid must stay observable; every skipped
    /// settlement lands here in addition to a warn log.
    pub fn record_settlement_skipped(&self) {
        self.settlements_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transfer_completed(&self) {
        self.transfers_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn settlements_skipped(&self) -> u64 {
        self.settlements_skipped.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let status_signals = self.status_signals.load(Ordering::Relaxed);
        let rfid_attaches = self.rfid_attaches.load(Ordering::Relaxed);
        let rejected = self.rejected_transitions.load(Ordering::Relaxed);
        let paid = self.settlements_paid.load(Ordering::Relaxed);
        let skipped = self.settlements_skipped.load(Ordering::Relaxed);
        let tokens = self.tokens_paid.load(Ordering::Relaxed);
        let transfers = self.transfers_completed.load(Ordering::Relaxed);

        format!(
            "# TYPE whirl_status_signals_total counter\n\
whirl_status_signals_total {}\n\
# TYPE whirl_rfid_attaches_total counter\n\
whirl_rfid_attaches_total {}\n\
# TYPE whirl_rejected_transitions_total counter\n\
whirl_rejected_transitions_total {}\n\
# TYPE whirl_settlements_paid_total counter\n\
whirl_settlements_paid_total {}\n\
# TYPE whirl_settlements_skipped_total counter\n\
whirl_settlements_skipped_total {}\n\
# TYPE whirl_tokens_paid_total counter\n\
whirl_tokens_paid_total {}\n\
# TYPE whirl_transfers_completed_total counter\n\
whirl_transfers_completed_total {}\n",
            status_signals, rfid_attaches, rejected, paid, skipped, tokens, transfers
        )
    }
}
