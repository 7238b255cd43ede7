use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::Settings;
use crate::core::{MatchOrchestrator, SearchDebouncer, SuggestionFetcher, SuggestionPanel};
use crate::core::search::InputOutcome;
use crate::models::{Decision, DecisionRecord, MatchCandidate, Party, Role, ScoreTier};
use crate::services::{ApiClient, ApiError, SessionStore, StoredSession};

/// Completions fed back into the single event loop by spawned fetches.
/// All engine state is mutated here, never on the spawned tasks.
pub enum AppEvent {
    Suggestions {
        generation: u64,
        suggestions: Vec<String>,
    },
    Ranking {
        generation: u64,
        result: Result<Vec<MatchCandidate>, ApiError>,
    },
}

/// Interactive terminal frontend for the review engine.
///
/// One cooperative loop owns every piece of mutable state; network calls
/// run on spawned tasks and come back as `AppEvent`s, so stale responses
/// are dropped at apply time by the engine's generation guards.
pub struct App {
    settings: Settings,
    api: Arc<ApiClient>,
    orchestrator: MatchOrchestrator,
    debouncer: SearchDebouncer,
    fetcher: SuggestionFetcher,
    panel: SuggestionPanel,
    session_store: SessionStore,
    active_role: Option<Role>,
    party: Option<Party>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    /// Run the client until stdin closes or the user quits.
    pub async fn run(
        settings: Settings,
        api: Arc<ApiClient>,
        session_store: SessionStore,
        restored: Option<StoredSession>,
    ) -> std::io::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(settings, api, session_store, restored, tx);

        app.print_banner();

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            let deadline = app.debouncer.deadline();
            let timer_deadline =
                deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !app.handle_command(line.trim()).await {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                Some(event) = rx.recv() => {
                    app.handle_event(event);
                }
                _ = tokio::time::sleep_until(timer_deadline), if deadline.is_some() => {
                    app.fire_search();
                }
            }
        }

        tracing::info!("JobDeck client shutting down");
        Ok(())
    }

    fn new(
        settings: Settings,
        api: Arc<ApiClient>,
        session_store: SessionStore,
        restored: Option<StoredSession>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let orchestrator =
            MatchOrchestrator::new(Arc::clone(&api), settings.swipe.commit_threshold);
        let debouncer = SearchDebouncer::new(Duration::from_millis(settings.search.debounce_ms));
        let fetcher = SuggestionFetcher::new(Arc::clone(&api));
        let active_role = restored.as_ref().and_then(|s| s.role);

        Self {
            settings,
            api,
            orchestrator,
            debouncer,
            fetcher,
            panel: SuggestionPanel::new(),
            session_store,
            active_role,
            party: None,
            events,
        }
    }

    fn print_banner(&self) {
        println!("JobDeck - match review client. Type 'help' for commands.");
        match (self.api.has_token(), self.active_role) {
            (true, Some(role)) => {
                println!("Session restored ({:?}). Use 'role' to load your deck.", role)
            }
            (true, None) => println!("Session restored. Pick a role with 'role'."),
            _ => println!("Not logged in. Use 'login <user> <pass>'."),
        }
    }

    // ── Commands ──────────────────────────────────────────────

    /// Returns false when the loop should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "help" => self.print_help(),
            "login" => self.login(rest).await,
            "logout" => self.logout(),
            "role" => self.select_role(rest),
            "refresh" => self.refresh(),
            "search" | "s" => self.search_input(rest),
            "accept" | "a" => self.decide(Decision::Accept),
            "reject" | "r" => self.decide(Decision::Reject),
            "drag" => self.drag(rest),
            "release" => self.release(),
            "deck" => self.print_deck(),
            "card" => self.print_top_card(),
            "compare" => self.compare(rest).await,
            "quit" | "exit" | "q" => return false,
            _ => println!("Unknown command '{}'. Type 'help'.", command),
        }

        true
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  login <user> <pass>          authenticate and store the session");
        println!("  logout                       clear the stored session");
        println!("  role <candidate|recruiter> <id>   pick the active party and load its deck");
        println!("  refresh                      re-fetch the ranked deck");
        println!("  search <text>                type into the job-title search box");
        println!("  accept | reject              decide on the top card (buttons)");
        println!("  drag <offset> / release      simulate a swipe gesture");
        println!("  deck | card                  show remaining cards / the top card");
        println!("  compare <candidateId> <jobId>     detailed two-way comparison");
        println!("  quit");
    }

    async fn login(&mut self, rest: &str) {
        let mut parts = rest.split_whitespace();
        let (username, password) = match (parts.next(), parts.next()) {
            (Some(u), Some(p)) => (u, p),
            _ => {
                println!("Usage: login <user> <pass>");
                return;
            }
        };

        match self.api.login(username, password).await {
            Ok(response) => {
                let session = StoredSession::new(response.token.clone(), Some(response.role));
                if let Err(e) = self.session_store.save(&session) {
                    tracing::warn!("Failed to persist session: {}", e);
                }

                self.rebuild_with(Arc::new(self.api.with_token(response.token)));
                self.active_role = Some(response.role);
                println!("Logged in as {:?}.", response.role);
            }
            Err(ApiError::Unauthorized) => println!("Invalid credentials."),
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                println!("Login failed; try again.");
            }
        }
    }

    fn logout(&mut self) {
        if let Err(e) = self.session_store.clear() {
            tracing::warn!("Failed to clear session: {}", e);
        }
        self.rebuild_with(Arc::new(self.api.without_token()));
        self.active_role = None;
        println!("Logged out.");
    }

    /// Replace the API client and every state object derived from it.
    /// Session boundaries reset the whole engine: fresh deck, fresh
    /// search state, no active party.
    fn rebuild_with(&mut self, api: Arc<ApiClient>) {
        self.api = Arc::clone(&api);
        self.orchestrator =
            MatchOrchestrator::new(Arc::clone(&api), self.settings.swipe.commit_threshold);
        self.fetcher = SuggestionFetcher::new(api);
        self.debouncer =
            SearchDebouncer::new(Duration::from_millis(self.settings.search.debounce_ms));
        self.panel = SuggestionPanel::new();
        self.party = None;
    }

    /// 401-class failure anywhere: tear the session down and return to
    /// the entry point. Distinct from transient failures, which degrade
    /// to empty states without touching the session.
    fn force_logout(&mut self) {
        tracing::warn!("Session token rejected; forcing logout");
        self.logout();
        println!("Your session expired. Please log in again.");
    }

    fn select_role(&mut self, rest: &str) {
        let mut parts = rest.split_whitespace();
        let role = match parts.next() {
            Some("candidate") => Role::Candidate,
            Some("recruiter") => Role::Recruiter,
            _ => {
                println!("Usage: role <candidate|recruiter> <id>");
                return;
            }
        };
        let id = match parts.next() {
            Some(id) => id.to_string(),
            None => {
                println!("Usage: role <candidate|recruiter> <id>");
                return;
            }
        };

        self.active_role = Some(role);
        self.party = Some(Party::new(id, role));

        if self.api.has_token() {
            if let Some(token_session) = self.session_store.load() {
                let updated = StoredSession::new(token_session.token, Some(role));
                if let Err(e) = self.session_store.save(&updated) {
                    tracing::warn!("Failed to persist role change: {}", e);
                }
            }
        }

        self.refresh();
    }

    fn refresh(&mut self) {
        let party = match &self.party {
            Some(party) => party.clone(),
            None => {
                println!("No active party. Use 'role <candidate|recruiter> <id>' first.");
                return;
            }
        };

        if self.orchestrator.is_busy() {
            // Not queued: the new request supersedes the outstanding one
            println!("Superseding the in-flight refresh...");
        } else {
            println!("Loading matches...");
        }

        let request = self.orchestrator.begin_refresh(&party);
        let api = Arc::clone(&self.api);
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = api.rank_for_party(&request.party).await;
            let _ = events.send(AppEvent::Ranking {
                generation: request.generation,
                result,
            });
        });
    }

    fn search_input(&mut self, text: &str) {
        match self.debouncer.on_input(text, Instant::now()) {
            InputOutcome::Cleared => {
                self.panel.clear();
                println!("(search cleared)");
            }
            InputOutcome::Scheduled => {}
        }
    }

    fn fire_search(&mut self) {
        let session = match self.debouncer.fire(Instant::now()) {
            Some(session) => session,
            None => return,
        };

        self.panel.begin();

        let fetcher = self.fetcher.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let suggestions = fetcher.fetch(&session).await;
            let _ = events.send(AppEvent::Suggestions {
                generation: session.generation,
                suggestions,
            });
        });
    }

    fn decide(&mut self, decision: Decision) {
        if self.orchestrator.deck().is_empty() {
            // Buttons are disabled on an exhausted deck
            println!("No cards left to review.");
            return;
        }

        if let Some(record) = self.orchestrator.decide(decision) {
            self.report(record);
            self.print_top_card();
        }
    }

    fn drag(&mut self, rest: &str) {
        let offset: f64 = match rest.parse() {
            Ok(offset) => offset,
            Err(_) => {
                println!("Usage: drag <offset>");
                return;
            }
        };

        if self.orchestrator.committer().phase() == crate::core::GesturePhase::Idle
            && !self.orchestrator.drag_start()
        {
            println!("Nothing to drag.");
            return;
        }

        self.orchestrator.drag_move(offset);
        let committer = self.orchestrator.committer();
        let (reject, accept) = committer.overlay_opacity();
        println!(
            "offset {:+.0}  rotation {:+.1}deg  PASS {:.0}%  APPLY {:.0}%",
            committer.offset(),
            committer.rotation(),
            reject * 100.0,
            accept * 100.0
        );
    }

    fn release(&mut self) {
        match self.orchestrator.drag_end() {
            Some(record) => {
                self.report(record);
                self.print_top_card();
            }
            None => println!("Card returns to rest."),
        }
    }

    /// Fire-and-forget decision report: never blocks the deck, never
    /// retried, failures logged and dropped.
    fn report(&self, record: DecisionRecord) {
        println!(
            "{} {}",
            match record.decision {
                Decision::Accept => "Accepted",
                Decision::Reject => "Passed on",
            },
            record.candidate_id
        );

        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            if let Err(e) = api.report_decision(&record).await {
                tracing::warn!("Decision report for {} dropped: {}", record.candidate_id, e);
            }
        });
    }

    async fn compare(&mut self, rest: &str) {
        let mut parts = rest.split_whitespace();
        let (candidate_id, job_id) = match (parts.next(), parts.next()) {
            (Some(c), Some(j)) => (c, j),
            _ => {
                println!("Usage: compare <candidateId> <jobId>");
                return;
            }
        };

        match self.orchestrator.compare(candidate_id, job_id).await {
            Ok(report) => {
                println!("Overall: {}%", report.overall_score);
                println!(
                    "  skills {}%  experience {}%  education {}%",
                    report.breakdown.skills_match,
                    report.breakdown.experience_match,
                    report.breakdown.education_match
                );
                if !report.matched_skills.is_empty() {
                    println!("  matched: {}", report.matched_skills.join(", "));
                }
                if !report.missing_skills.is_empty() {
                    println!("  missing: {}", report.missing_skills.join(", "));
                }
            }
            Err(ApiError::Unauthorized) => self.force_logout(),
            Err(e) => {
                tracing::warn!("Compare failed: {}", e);
                println!("Comparison unavailable right now.");
            }
        }
    }

    // ── Completions ───────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Suggestions {
                generation,
                suggestions,
            } => {
                if self.panel.apply(&self.debouncer, generation, suggestions) {
                    self.print_suggestions();
                }
            }
            AppEvent::Ranking { generation, result } => {
                if let Err(ApiError::Unauthorized) = &result {
                    self.force_logout();
                    return;
                }

                use crate::core::RefreshOutcome;
                match self.orchestrator.apply_ranking(generation, result) {
                    RefreshOutcome::Applied(0) => println!("No matches right now."),
                    RefreshOutcome::Applied(count) => {
                        println!("{} matches loaded.", count);
                        self.print_top_card();
                    }
                    RefreshOutcome::Failed => println!("Couldn't load matches."),
                    RefreshOutcome::Stale => {}
                }
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────

    fn print_suggestions(&self) {
        let limit = self.settings.search.max_suggestions;
        let suggestions = self.panel.suggestions();
        if suggestions.is_empty() {
            println!("No suggestions.");
            return;
        }
        for suggestion in suggestions.iter().take(limit) {
            println!("  > {}", suggestion);
        }
    }

    fn print_top_card(&self) {
        if self.orchestrator.is_busy() {
            println!("Loading matches...");
            return;
        }

        match self.orchestrator.deck().peek_top() {
            Some(card) => {
                let badge = match card.score_tier() {
                    ScoreTier::Strong => "[strong]",
                    ScoreTier::Middling => "[fair]",
                    ScoreTier::Weak => "[weak]",
                };
                println!(
                    "{} ({}) {}% {}",
                    card.attributes.title, card.attributes.subtitle, card.score, badge
                );
                if !card.attributes.tags.is_empty() {
                    println!("  {}", card.attributes.tags.join(" | "));
                }
                println!("  {} card(s) remaining", self.orchestrator.deck().len());
            }
            None => println!("All caught up! Use 'refresh' to look again."),
        }
    }

    fn print_deck(&self) {
        let deck = self.orchestrator.deck();
        if deck.is_empty() {
            println!("Deck is empty.");
            return;
        }
        for (index, card) in deck.iter().enumerate() {
            println!(
                "{:>3}. {} ({}%) - {}",
                index + 1,
                card.attributes.title,
                card.score,
                card.attributes.subtitle
            );
        }
    }
}
