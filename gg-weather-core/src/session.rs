//! End-to-end orchestration: one user action runs the whole
//! build → fetch → interpret → map pipeline and drives a [`Presenter`].

use chrono::{DateTime, TimeZone};
use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};
use tracing::{info, warn};

use crate::{
    CityId, WeatherError,
    interpret::interpret,
    model::WeatherSnapshot,
    present::DisplayCard,
    provider::{ClientConfig, KmaClient, ObservationClient},
    query::{ObservationQuery, display_timestamp},
};

/// Sinks of the external presentation layer.
pub trait Presenter {
    /// Hide content and error, show the spinner.
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    fn show_card(&mut self, card: &DisplayCard, snapshot: &WeatherSnapshot);
    /// Generic failure state; causes are not distinguished in the UI.
    fn show_error(&mut self, error: &WeatherError);
    /// Submission without a city.
    fn prompt_city_required(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failure,
}

/// Last successful result, kept until the next cycle finishes.
#[derive(Debug, Clone)]
pub struct Report {
    pub city: CityId,
    pub snapshot: WeatherSnapshot,
    pub card: DisplayCard,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Rendered(Box<Report>),
    Failed(WeatherError),
    CityRequired,
    /// Another submit was still loading; this one did nothing.
    Ignored,
}

#[derive(Debug)]
struct SessionState {
    phase: Phase,
    current: Option<Report>,
}

/// Runs the fetch & transform pipeline once and returns the snapshot.
pub async fn fetch_snapshot<C, Tz>(
    client: &C,
    service_key: &str,
    city: CityId,
    now: &DateTime<Tz>,
) -> Result<WeatherSnapshot, WeatherError>
where
    C: ObservationClient + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let query = ObservationQuery::build(service_key, city, now);
    let envelope = client.fetch(&query).await?;
    let fields = interpret(envelope)?;

    Ok(WeatherSnapshot::from(fields))
}

#[derive(Debug)]
pub struct Session<C> {
    client: C,
    service_key: String,
    in_flight: AtomicBool,
    state: Mutex<SessionState>,
}

impl Session<KmaClient> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, WeatherError> {
        Ok(Self::new(KmaClient::new(config)?, config.service_key.clone()))
    }
}

impl<C: ObservationClient> Session<C> {
    pub fn new(client: C, service_key: impl Into<String>) -> Self {
        Self {
            client,
            service_key: service_key.into(),
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SessionState { phase: Phase::Idle, current: None }),
        }
    }

    pub fn phase(&self) -> Phase {
        self.lock_state().phase
    }

    pub fn current(&self) -> Option<Report> {
        self.lock_state().current.clone()
    }

    /// Handles one user action. While a previous submit is still loading
    /// the call is ignored.
    pub async fn submit<P, Tz>(
        &self,
        city: Option<CityId>,
        now: &DateTime<Tz>,
        presenter: &mut P,
    ) -> SubmitOutcome
    where
        P: Presenter + ?Sized,
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let Some(city) = city else {
            presenter.prompt_city_required();
            return SubmitOutcome::CityRequired;
        };

        let Some(_guard) = InFlightGuard::acquire(self) else {
            info!(%city, "Request already in flight, ignoring submit");
            return SubmitOutcome::Ignored;
        };

        self.lock_state().phase = Phase::Loading;
        presenter.show_loading();

        let result = fetch_snapshot(&self.client, &self.service_key, city, now).await;
        presenter.hide_loading();

        let mut state = self.lock_state();
        match result {
            Ok(snapshot) => {
                info!(%city, condition = ?snapshot.condition, "Weather snapshot ready");
                let card = DisplayCard::new(city, &snapshot, display_timestamp(now));
                presenter.show_card(&card, &snapshot);

                let report = Report { city, snapshot, card };
                state.phase = Phase::Success;
                state.current = Some(report.clone());
                SubmitOutcome::Rendered(Box::new(report))
            }
            Err(err) => {
                warn!(%city, error = %err, "Weather lookup failed");
                presenter.show_error(&err);

                state.phase = Phase::Failure;
                state.current = None;
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        // State is only assigned whole values, so a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Holds the in-flight flag for one submit. Released on drop, so a cancelled
/// submit leaves the session usable.
struct InFlightGuard<'a, C: ObservationClient> {
    session: &'a Session<C>,
}

impl<'a, C: ObservationClient> InFlightGuard<'a, C> {
    fn acquire(session: &'a Session<C>) -> Option<Self> {
        session
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { session })
    }
}

impl<C: ObservationClient> Drop for InFlightGuard<'_, C> {
    fn drop(&mut self) {
        let mut state = self.session.lock_state();
        if state.phase == Phase::Loading {
            state.phase = Phase::Idle;
        }
        drop(state);
        self.session.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::decode_envelope;
    use crate::model::Condition;
    use crate::interpret::ApiEnvelope;
    use async_trait::async_trait;
    use chrono::{FixedOffset, Utc};
    use std::sync::atomic::AtomicUsize;

    /// Answers call N with `bodies[N]`, repeating the last body afterwards.
    #[derive(Debug)]
    struct CannedClient {
        bodies: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl CannedClient {
        fn new(body: &'static str) -> Self {
            Self::sequence(vec![body])
        }

        fn sequence(bodies: Vec<&'static str>) -> Self {
            Self { bodies, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ObservationClient for CannedClient {
        async fn fetch(&self, _query: &ObservationQuery) -> Result<ApiEnvelope, WeatherError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            let body = self.bodies[call.min(self.bodies.len() - 1)];
            decode_envelope(body)
        }
    }

    #[derive(Debug, Default)]
    struct RecordingPresenter {
        events: Vec<String>,
    }

    impl Presenter for RecordingPresenter {
        fn show_loading(&mut self) {
            self.events.push("loading".into());
        }
        fn hide_loading(&mut self) {
            self.events.push("loaded".into());
        }
        fn show_card(&mut self, card: &DisplayCard, _snapshot: &WeatherSnapshot) {
            self.events.push(format!("card:{}", card.condition));
        }
        fn show_error(&mut self, _error: &WeatherError) {
            self.events.push("error".into());
        }
        fn prompt_city_required(&mut self) {
            self.events.push("prompt".into());
        }
    }

    const CLEAR: &str = r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL_SERVICE"},
        "body":{"items":{"item":[{"category":"T1H","obsrValue":"26.3"},{"category":"REH","obsrValue":"40"}]}}}}"#;
    const FAILED: &str =
        r#"{"response":{"header":{"resultCode":"01","resultMsg":"APPLICATION_ERROR"}}}"#;

    fn kst_now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600).unwrap().with_ymd_and_hms(2024, 7, 15, 14, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn success_renders_card_and_keeps_report() {
        let session = Session::new(CannedClient::new(CLEAR), "KEY");
        let mut presenter = RecordingPresenter::default();

        let outcome = session.submit(Some(CityId::Suwon), &kst_now(), &mut presenter).await;

        let SubmitOutcome::Rendered(report) = outcome else {
            panic!("expected rendered outcome, got {outcome:?}");
        };
        assert_eq!(report.snapshot.condition, Condition::Clear);
        assert_eq!(report.card.city_name, "수원시");
        assert_eq!(report.card.timestamp, "2024.07.15 14:30");
        assert_eq!(presenter.events, ["loading", "loaded", "card:맑음"]);
        assert_eq!(session.phase(), Phase::Success);
        assert!(session.current().is_some());
    }

    #[tokio::test]
    async fn missing_city_prompts_without_fetching() {
        let session = Session::new(CannedClient::new(CLEAR), "KEY");
        let mut presenter = RecordingPresenter::default();

        let outcome = session.submit(None, &Utc::now(), &mut presenter).await;

        assert!(matches!(outcome, SubmitOutcome::CityRequired));
        assert_eq!(presenter.events, ["prompt"]);
        assert_eq!(session.client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn failure_clears_previous_snapshot() {
        let session = Session::new(CannedClient::sequence(vec![CLEAR, FAILED]), "KEY");

        let mut presenter = RecordingPresenter::default();
        let first = session.submit(Some(CityId::Ansan), &kst_now(), &mut presenter).await;
        assert!(matches!(first, SubmitOutcome::Rendered(_)));
        assert_eq!(session.phase(), Phase::Success);
        assert!(session.current().is_some());

        let mut presenter = RecordingPresenter::default();
        let second = session.submit(Some(CityId::Ansan), &kst_now(), &mut presenter).await;

        assert!(matches!(second, SubmitOutcome::Failed(WeatherError::ApiResponse { .. })));
        assert_eq!(presenter.events, ["loading", "loaded", "error"]);
        assert_eq!(session.phase(), Phase::Failure);
        assert!(session.current().is_none());
        assert_eq!(session.client.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn submit_while_loading_is_ignored() {
        let session = Session::new(CannedClient::new(CLEAR), "KEY");
        let mut first = RecordingPresenter::default();
        let mut second = RecordingPresenter::default();
        let now = kst_now();

        let (a, b) = tokio::join!(
            session.submit(Some(CityId::Goyang), &now, &mut first),
            session.submit(Some(CityId::Yongin), &now, &mut second),
        );

        assert!(matches!(a, SubmitOutcome::Rendered(_)));
        assert!(matches!(b, SubmitOutcome::Ignored));
        assert!(second.events.is_empty());
        assert_eq!(session.client.calls.load(Ordering::SeqCst), 1);

        // Flag is released: the next action goes through again.
        let mut third = RecordingPresenter::default();
        let c = session.submit(Some(CityId::Yongin), &now, &mut third).await;
        assert!(matches!(c, SubmitOutcome::Rendered(_)));
    }

    #[tokio::test]
    async fn dropped_submit_releases_in_flight_flag() {
        let session = Session::new(CannedClient::new(CLEAR), "KEY");
        let now = kst_now();
        let mut presenter = RecordingPresenter::default();

        {
            let fut = session.submit(Some(CityId::Anyang), &now, &mut presenter);
            let mut fut = Box::pin(fut);
            // Poll once so the guard is taken, then drop mid-flight.
            let _ = futures_poll_once(fut.as_mut()).await;
        }

        assert_eq!(session.phase(), Phase::Idle);
        let mut presenter = RecordingPresenter::default();
        let outcome = session.submit(Some(CityId::Anyang), &now, &mut presenter).await;
        assert!(matches!(outcome, SubmitOutcome::Rendered(_)));
    }

    async fn futures_poll_once<F: std::future::Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            out = fut => Some(out),
            _ = std::future::ready(()) => None,
        }
    }

    #[tokio::test]
    async fn fetch_snapshot_runs_pipeline() {
        let client = CannedClient::new(
            r#"{"response":{"header":{"resultCode":"00"},"body":{"items":{"item":[
                {"category":"PTY","obsrValue":"3"},{"category":"T1H","obsrValue":"5.0"}]}}}}"#,
        );

        let snapshot = fetch_snapshot(&client, "KEY", CityId::Seongnam, &kst_now())
            .await
            .expect("pipeline should succeed");

        assert_eq!(snapshot.condition, Condition::Snow);
        assert_eq!(snapshot.icon, "❄️");
        assert_eq!(snapshot.fields.temperature_c, Some(5));
    }
}
