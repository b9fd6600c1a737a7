//! Drivers that carry out wizard commands.
//!
//! - [`execute`] runs one command against a [`BookingApi`].
//! - [`BookingSession`] owns a wizard and awaits each request inline.
//! - [`BackgroundDriver`] spawns requests for an event loop and hands the
//!   completions back over a channel, cancelling whatever is in flight on
//!   reset or drop.
//!
//! 取消只通过 `reset` 或 drop 发生，wizard 与 driver 的在途状态保持一致。

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::client::BookingApi;
use crate::error::WizardResult;
use crate::wizard::{BookingWizard, Command, Completion, Outcome, Ticket, WizardStep};

/// Runs a command to completion
pub async fn execute<A: BookingApi + ?Sized>(api: &A, command: &Command) -> Completion {
    match command {
        Command::FetchSlots { ticket, guests } => Completion {
            ticket: *ticket,
            outcome: Outcome::Slots(api.time_slots(*guests).await),
        },
        Command::SubmitReservation { ticket, request } => Completion {
            ticket: *ticket,
            outcome: Outcome::Reservation(api.create_reservation(request).await),
        },
    }
}

// ============================================================================
// BookingSession
// ============================================================================

/// A wizard paired with an api, one awaited request at a time.
///
/// Each async method returns the step the wizard is at once the request
/// has settled. A failed request is not an `Err`: it leaves the wizard on
/// the same step with the banner set.
///
/// # Example
///
/// ```ignore
/// let mut session = BookingSession::new(ClientConfig::default().build_http_client()?);
/// session.submit_guest_count("2").await?;
/// session.select_time("20:00")?;
/// session.submit_contact("Alex", "555-1234").await?;
/// println!("{}", session.wizard().confirmation().unwrap());
/// ```
#[derive(Debug)]
pub struct BookingSession<A> {
    wizard: BookingWizard,
    api: A,
}

impl<A: BookingApi> BookingSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            wizard: BookingWizard::new(),
            api,
        }
    }

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn submit_guest_count(&mut self, input: &str) -> WizardResult<WizardStep> {
        let command = self.wizard.submit_guest_count(input)?;
        self.run(command).await
    }

    pub fn select_time(&mut self, time: &str) -> WizardResult<WizardStep> {
        self.wizard.select_time(time)?;
        Ok(self.wizard.step())
    }

    pub async fn submit_contact(&mut self, name: &str, phone: &str) -> WizardResult<WizardStep> {
        let command = self.wizard.submit_contact(name, phone)?;
        self.run(command).await
    }

    pub fn reset(&mut self) {
        self.wizard.reset();
    }

    async fn run(&mut self, command: Command) -> WizardResult<WizardStep> {
        let completion = execute(&self.api, &command).await;
        self.wizard.apply(completion);
        Ok(self.wizard.step())
    }
}

// ============================================================================
// BackgroundDriver
// ============================================================================

/// Runs commands on the tokio runtime for an event loop.
///
/// The loop owns the wizard, passes every returned [`Command`] to
/// [`dispatch`](Self::dispatch), and applies completions as they arrive on
/// the receiver returned by [`new`](Self::new). At most one request runs;
/// dispatching a new one cancels the previous.
#[derive(Debug)]
pub struct BackgroundDriver<A> {
    api: Arc<A>,
    completions: mpsc::UnboundedSender<Completion>,
    in_flight: Option<(Ticket, CancellationToken)>,
}

impl<A: BookingApi + 'static> BackgroundDriver<A> {
    pub fn new(api: A) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = Self {
            api: Arc::new(api),
            completions: tx,
            in_flight: None,
        };
        (driver, rx)
    }

    /// Spawns the request. Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, command: Command) {
        self.cancel();

        let ticket = command.ticket();
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let api = Arc::clone(&self.api);
        let tx = self.completions.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    tracing::debug!(%ticket, "Request cancelled");
                }
                completion = execute(api.as_ref(), &command) => {
                    if tx.send(completion).is_err() {
                        tracing::debug!(%ticket, "Completion receiver dropped");
                    }
                }
            }
        });

        self.in_flight = Some((ticket, token));
    }

    /// Resets the wizard and cancels its abandoned request.
    ///
    /// The only way to cancel from outside: the wizard forgets the ticket in
    /// the same call, so it is never left waiting on a completion that will
    /// not arrive.
    pub fn reset(&mut self, wizard: &mut BookingWizard) {
        wizard.reset();
        self.cancel();
    }

    fn cancel(&mut self) -> Option<Ticket> {
        let (ticket, token) = self.in_flight.take()?;
        token.cancel();
        tracing::debug!(%ticket, "Cancelling in-flight request");
        Some(ticket)
    }

    /// Ticket of the last dispatched request that has not been cancelled
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight.as_ref().map(|(ticket, _)| *ticket)
    }
}

impl<A> Drop for BackgroundDriver<A> {
    fn drop(&mut self) {
        if let Some((_, token)) = self.in_flight.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientError, ClientResult};
    use async_trait::async_trait;
    use shared::{GuestCount, ReservationRequest, TimeSlot};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Scripted api that records every call
    #[derive(Default)]
    struct FakeApi {
        slots: Vec<TimeSlot>,
        fail_slots: bool,
        fail_reservation: bool,
        slot_calls: AtomicUsize,
        reservations: Mutex<Vec<ReservationRequest>>,
        /// When set, time_slots waits for a notification before answering
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl BookingApi for FakeApi {
        async fn time_slots(&self, _guests: GuestCount) -> ClientResult<Vec<TimeSlot>> {
            self.slot_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_slots {
                return Err(ClientError::Status {
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(self.slots.clone())
        }

        async fn create_reservation(
            &self,
            request: &ReservationRequest,
        ) -> ClientResult<serde_json::Value> {
            self.reservations.lock().unwrap().push(request.clone());
            if self.fail_reservation {
                return Err(ClientError::Status {
                    status: 503,
                    body: String::new(),
                });
            }
            Ok(serde_json::json!({ "ok": true }))
        }
    }

    #[tokio::test]
    async fn test_session_end_to_end() {
        let api = FakeApi {
            slots: vec![TimeSlot::available("20:00")],
            ..Default::default()
        };
        let mut session = BookingSession::new(api);

        assert_eq!(
            session.submit_guest_count("2").await.unwrap(),
            WizardStep::SelectingTime
        );
        assert_eq!(
            session.select_time("20:00").unwrap(),
            WizardStep::CollectingContact
        );
        assert_eq!(
            session.submit_contact("Alex", "555-1234").await.unwrap(),
            WizardStep::Confirmed
        );

        let sent = session.api().reservations.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].time_slot, "20:00");
        assert_eq!(sent[0].guests, 2);
    }

    #[tokio::test]
    async fn test_session_validation_skips_the_api() {
        let api = FakeApi {
            slots: vec![TimeSlot::available("20:00")],
            ..Default::default()
        };
        let mut session = BookingSession::new(api);

        assert!(session.submit_guest_count("0").await.is_err());
        assert_eq!(session.api().slot_calls.load(Ordering::SeqCst), 0);

        session.submit_guest_count("2").await.unwrap();
        session.select_time("20:00").unwrap();
        assert!(session.submit_contact("Alex", "").await.is_err());
        assert!(session.api().reservations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_failures_stay_on_step() {
        let api = FakeApi {
            fail_slots: true,
            ..Default::default()
        };
        let mut session = BookingSession::new(api);

        let step = session.submit_guest_count("3").await.unwrap();
        assert_eq!(step, WizardStep::CollectingGuests);
        assert_eq!(
            session.wizard().error(),
            Some("Error fetching available times. Please try again.")
        );
        assert!(session.wizard().slots().is_empty());
    }

    #[tokio::test]
    async fn test_session_reservation_failure() {
        let api = FakeApi {
            slots: vec![TimeSlot::available("18:00")],
            fail_reservation: true,
            ..Default::default()
        };
        let mut session = BookingSession::new(api);
        session.submit_guest_count("2").await.unwrap();
        session.select_time("18:00").unwrap();

        let step = session.submit_contact("Alex", "555-1234").await.unwrap();
        assert_eq!(step, WizardStep::CollectingContact);
        assert_eq!(
            session.wizard().error(),
            Some("Error making reservation. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_background_driver_delivers_completion() {
        let api = FakeApi {
            slots: vec![TimeSlot::available("18:00")],
            ..Default::default()
        };
        let (mut driver, mut rx) = BackgroundDriver::new(api);
        let mut wizard = BookingWizard::new();

        let command = wizard.submit_guest_count("2").unwrap();
        driver.dispatch(command);
        assert!(driver.in_flight().is_some());

        let completion = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(wizard.apply(completion));
        assert_eq!(wizard.step(), WizardStep::SelectingTime);
    }

    #[tokio::test]
    async fn test_background_driver_reset_cancels_request() {
        let gate = Arc::new(Notify::new());
        let api = FakeApi {
            slots: vec![TimeSlot::available("18:00")],
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let (mut driver, mut rx) = BackgroundDriver::new(api);
        let mut wizard = BookingWizard::new();

        driver.dispatch(wizard.submit_guest_count("2").unwrap());
        driver.reset(&mut wizard);
        assert!(driver.in_flight().is_none());

        // 放行请求；已取消的任务不能再回报结果
        gate.notify_waiters();
        let received = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(received.is_err(), "cancelled request delivered a completion");
        assert_eq!(wizard.step(), WizardStep::CollectingGuests);
        assert!(wizard.slots().is_empty());
    }

    #[tokio::test]
    async fn test_background_driver_reset_leaves_wizard_ready() {
        let gate = Arc::new(Notify::new());
        let api = FakeApi {
            slots: vec![TimeSlot::available("18:00")],
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let (mut driver, mut rx) = BackgroundDriver::new(api);
        let mut wizard = BookingWizard::new();

        driver.dispatch(wizard.submit_guest_count("2").unwrap());
        driver.reset(&mut wizard);
        assert!(!wizard.is_loading());
        assert!(wizard.in_flight().is_none());

        // A fresh attempt is accepted and settles normally
        let retry = wizard.submit_guest_count("2").unwrap();
        driver.dispatch(retry);
        tokio::time::sleep(Duration::from_millis(20)).await;
        gate.notify_waiters();

        let completion = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(wizard.apply(completion));
        assert!(!wizard.is_loading());
        assert_eq!(wizard.step(), WizardStep::SelectingTime);
    }

    #[tokio::test]
    async fn test_background_driver_drop_cancels_request() {
        let gate = Arc::new(Notify::new());
        let api = FakeApi {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let (mut driver, mut rx) = BackgroundDriver::new(api);
        let mut wizard = BookingWizard::new();

        driver.dispatch(wizard.submit_guest_count("2").unwrap());
        drop(driver);
        gate.notify_waiters();

        // 取消的任务退出后，所有 sender 都已释放
        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert!(received.is_none());
    }
}
