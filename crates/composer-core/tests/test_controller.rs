//! Composer controller behaviour against scripted collaborators

use async_trait::async_trait;
use composer_core::{
    Activity, ComposerController, ComposerError, MailTransport, OperationState, ResponseSchema,
    Result, SendReceipt, TextGenerator, Tone,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

const BODY: &str = "Hi Sam,\n\nWould you like to come over for dinner on Friday?\n\nBest,\nAlex";
const SUBJECTS_JSON: &str = r#"{"subjects": ["Dinner on Friday?", "Come over for dinner", "Friday dinner plans"]}"#;

#[derive(Debug, Clone)]
struct GenerationCall {
    prompt: String,
    structured: bool,
}

/// Returns scripted replies in order; optionally parks calls until released
struct MockGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<GenerationCall>>,
    hold_plain: Option<Arc<Notify>>,
    hold_structured: Option<Arc<Notify>>,
}

impl MockGenerator {
    fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
            hold_plain: None,
            hold_structured: None,
        }
    }

    fn holding_plain(mut self, gate: Arc<Notify>) -> Self {
        self.hold_plain = Some(gate);
        self
    }

    fn holding_structured(mut self, gate: Arc<Notify>) -> Self {
        self.hold_structured = Some(gate);
        self
    }

    fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str, schema: Option<&ResponseSchema>) -> Result<String> {
        self.calls.lock().unwrap().push(GenerationCall {
            prompt: prompt.to_string(),
            structured: schema.is_some(),
        });
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ComposerError::Upstream("no scripted response".to_string())));

        let gate = if schema.is_some() { &self.hold_structured } else { &self.hold_plain };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        response
    }
}

#[derive(Debug, Clone, Copy)]
enum TransportBehavior {
    Deliver,
    Reject,
    Break,
    Panic,
}

#[derive(Debug, Clone, PartialEq)]
struct SentEmail {
    recipients: Vec<String>,
    subject: String,
    body: String,
}

struct MockTransport {
    behavior: TransportBehavior,
    sent: Mutex<Vec<SentEmail>>,
}

impl MockTransport {
    fn new(behavior: TransportBehavior) -> Self {
        Self {
            behavior,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<SendReceipt> {
        self.sent.lock().unwrap().push(SentEmail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        match self.behavior {
            TransportBehavior::Deliver => Ok(SendReceipt {
                message: "Email sent successfully!".to_string(),
                recipients: recipients.len(),
            }),
            TransportBehavior::Reject => Err(ComposerError::Transport("Mailbox quota exceeded".to_string())),
            TransportBehavior::Break => Err(ComposerError::Upstream("socket closed".to_string())),
            TransportBehavior::Panic => panic!("transport blew up"),
        }
    }
}

fn controller(
    responses: Vec<Result<String>>,
    behavior: TransportBehavior,
) -> ComposerController<MockGenerator, MockTransport> {
    let _ = env_logger::builder().is_test(true).try_init();
    ComposerController::new(MockGenerator::new(responses), MockTransport::new(behavior))
}

/// Controller holding a generated draft with suggestions and a chosen subject
async fn drafted(behavior: TransportBehavior, extra: Vec<Result<String>>) -> ComposerController<MockGenerator, MockTransport> {
    let mut responses = vec![Ok(BODY.to_string()), Ok(SUBJECTS_JSON.to_string())];
    responses.extend(extra);
    let controller = controller(responses, behavior);
    controller.set_prompt("invite a friend to dinner");
    controller.generate().await.unwrap();
    controller.choose_suggestion(0).unwrap();
    controller
}

mod generate_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_without_network_call() {
        for prompt in ["", "   "] {
            let controller = controller(vec![Ok(BODY.to_string())], TransportBehavior::Deliver);
            controller.set_prompt(prompt);

            let result = controller.generate().await;

            assert!(matches!(result, Err(ComposerError::Validation(_))));
            assert!(controller.generator().calls().is_empty());
            let snapshot = controller.snapshot();
            assert_eq!(snapshot.error.as_deref(), Some("Please enter a prompt for the email."));
            assert_eq!(snapshot.generate, OperationState::Idle);
        }
    }

    #[tokio::test]
    async fn test_generate_chains_into_suggest_once() {
        let controller = controller(
            vec![Ok(BODY.to_string()), Ok(SUBJECTS_JSON.to_string())],
            TransportBehavior::Deliver,
        );
        controller.set_prompt("invite a friend to dinner");

        controller.generate().await.unwrap();

        let calls = controller.generator().calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls[0].structured);
        assert!(calls[0].prompt.ends_with("invite a friend to dinner"));
        assert!(calls[1].structured);
        assert!(calls[1].prompt.contains(BODY), "Suggest must receive the fresh body");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.draft.body, BODY);
        assert_eq!(
            snapshot.draft.suggested_subjects,
            vec!["Dinner on Friday?", "Come over for dinner", "Friday dinner plans"]
        );
        assert_eq!(snapshot.draft.subject, "");
        assert_eq!(snapshot.generate, OperationState::Succeeded);
        assert_eq!(snapshot.suggest, OperationState::Succeeded);
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.activity(), Activity::Idle);
    }

    #[tokio::test]
    async fn test_suggest_failures_stay_silent() {
        let failures = vec![
            Err(ComposerError::Upstream("API call failed".to_string())),
            Ok("Sure! Here are three subject lines...".to_string()),
        ];

        for failure in failures {
            let controller = controller(vec![Ok(BODY.to_string()), failure], TransportBehavior::Deliver);
            controller.set_prompt("invite a friend to dinner");

            let result = controller.generate().await;

            assert!(result.is_ok(), "Suggest failure must not fail generate");
            let snapshot = controller.snapshot();
            assert_eq!(snapshot.error, None);
            assert_eq!(snapshot.draft.body, BODY);
            assert!(snapshot.draft.suggested_subjects.is_empty());
            assert_eq!(snapshot.suggest, OperationState::Failed);
            assert_eq!(snapshot.generate, OperationState::Succeeded);
        }
    }

    #[tokio::test]
    async fn test_generate_failure_records_error() {
        let controller = controller(
            vec![Err(ComposerError::Upstream("Invalid response from API.".to_string()))],
            TransportBehavior::Deliver,
        );
        controller.set_prompt("invite a friend to dinner");

        let result = controller.generate().await;

        assert!(matches!(result, Err(ComposerError::Upstream(_))));
        assert_eq!(controller.generator().calls().len(), 1, "No suggest after a failed draft");
        let snapshot = controller.snapshot();
        assert!(snapshot.error.unwrap().contains("Invalid response from API."));
        assert_eq!(snapshot.draft.body, "");
        assert_eq!(snapshot.generate, OperationState::Failed);
        assert_eq!(snapshot.suggest, OperationState::Idle);
    }

    #[tokio::test]
    async fn test_missing_credential_surfaces_as_config_error() {
        let controller = controller(
            vec![Err(ComposerError::Config("Gemini API key is not set.".to_string()))],
            TransportBehavior::Deliver,
        );
        controller.set_prompt("invite a friend to dinner");

        let result = controller.generate().await;

        assert!(matches!(result, Err(ComposerError::Config(_))));
        assert!(controller.snapshot().error.unwrap().contains("API key is not set"));
    }

    #[tokio::test]
    async fn test_generate_resets_previous_draft() {
        let controller = drafted(
            TransportBehavior::Reject,
            vec![Ok("Second body".to_string()), Ok(r#"{"subjects": ["Again"]}"#.to_string())],
        )
        .await;
        controller.set_recipients("f@a.com");
        assert!(controller.send().await.is_err());
        assert_eq!(controller.snapshot().error.as_deref(), Some("Mailbox quota exceeded"));

        controller.generate().await.unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.draft.subject, "", "Subject is cleared by a new draft");
        assert_eq!(snapshot.draft.body, "Second body");
        assert_eq!(snapshot.draft.suggested_subjects, vec!["Again"]);
        assert!(!snapshot.sent);
    }

    #[tokio::test]
    async fn test_suggest_overlaps_generate() {
        let gate = Arc::new(Notify::new());
        let generator = MockGenerator::new(vec![Ok(BODY.to_string()), Ok(SUBJECTS_JSON.to_string())])
            .holding_structured(gate.clone());
        let controller = Arc::new(ComposerController::new(generator, MockTransport::new(TransportBehavior::Deliver)));
        controller.set_prompt("invite a friend to dinner");

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.generate().await })
        };

        while !controller.snapshot().suggest.is_in_flight() {
            tokio::task::yield_now().await;
        }
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.generate, OperationState::InFlight);
        assert_eq!(snapshot.activity(), Activity::Suggesting);
        assert_eq!(snapshot.draft.body, BODY, "Body is visible while subjects load");

        gate.notify_one();
        task.await.unwrap().unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.generate, OperationState::Succeeded);
        assert_eq!(snapshot.draft.suggested_subjects.len(), 3);
    }
}

mod refine_tests {
    use super::*;

    #[tokio::test]
    async fn test_refine_without_body_is_noop() {
        let controller = controller(vec![Ok("unused".to_string())], TransportBehavior::Deliver);
        controller.set_subject("Kept");
        let before = controller.snapshot();

        controller.refine(Tone::Formal).await.unwrap();

        let after = controller.snapshot();
        assert!(controller.generator().calls().is_empty());
        assert_eq!(after.draft, before.draft);
        assert_eq!(after.refine, OperationState::Idle);
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn test_refine_replaces_body_only() {
        let controller = drafted(TransportBehavior::Deliver, vec![Ok("Dear Sam, I cordially invite you.".to_string())]).await;

        controller.refine(Tone::Formal).await.unwrap();

        let calls = controller.generator().calls();
        let refine_call = calls.last().unwrap();
        assert!(refine_call.prompt.contains("much more Formal tone"));
        assert!(refine_call.prompt.ends_with(BODY));
        assert!(!refine_call.structured);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.draft.body, "Dear Sam, I cordially invite you.");
        assert_eq!(snapshot.draft.subject, "Dinner on Friday?");
        assert_eq!(snapshot.draft.suggested_subjects.len(), 3);
        assert_eq!(snapshot.refine, OperationState::Succeeded);
    }

    #[tokio::test]
    async fn test_refine_failure_keeps_body() {
        let controller = drafted(
            TransportBehavior::Deliver,
            vec![Err(ComposerError::Upstream("API call failed with status 500".to_string()))],
        )
        .await;

        let result = controller.refine(Tone::Casual).await;

        assert!(result.is_err());
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.draft.body, BODY);
        assert!(snapshot.error.unwrap().contains("status 500"));
        assert_eq!(snapshot.refine, OperationState::Failed);
    }

    #[tokio::test]
    async fn test_refine_rejects_reentry() {
        let gate = Arc::new(Notify::new());
        let generator = MockGenerator::new(vec![Ok("Yo Sam, dinner?".to_string())]).holding_plain(gate.clone());
        let controller = Arc::new(ComposerController::new(generator, MockTransport::new(TransportBehavior::Deliver)));
        controller.set_body(BODY);

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.refine(Tone::Casual).await })
        };
        while !controller.snapshot().refine.is_in_flight() {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.snapshot().activity(), Activity::Refining);

        let second = controller.refine(Tone::Persuasive).await;
        assert!(matches!(second, Err(ComposerError::AlreadyInFlight(composer_core::OperationKind::Refine))));

        gate.notify_one();
        task.await.unwrap().unwrap();

        assert_eq!(controller.generator().calls().len(), 1);
        assert_eq!(controller.snapshot().draft.body, "Yo Sam, dinner?");
        assert_eq!(controller.snapshot().error, None);
    }
}

mod send_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_requires_all_fields() {
        let cases = [("", "Subject", BODY), ("f@a.com", "", BODY), ("f@a.com", "Subject", ""), ("  ", "Subject", BODY)];

        for (recipients, subject, body) in cases {
            let controller = controller(vec![], TransportBehavior::Deliver);
            controller.set_recipients(recipients);
            controller.set_subject(subject);
            controller.set_body(body);

            let result = controller.send().await;

            assert!(matches!(result, Err(ComposerError::Validation(_))));
            assert!(controller.transport().sent().is_empty());
            let snapshot = controller.snapshot();
            assert_eq!(
                snapshot.error.as_deref(),
                Some("Please provide recipients, a subject, and generate an email before sending.")
            );
            assert_eq!(snapshot.send, OperationState::Idle);
        }
    }

    #[tokio::test]
    async fn test_send_success_clears_session() {
        let controller = drafted(TransportBehavior::Deliver, vec![]).await;
        controller.set_recipients("a@x.com, b@y.com");

        let receipt = controller.send().await.unwrap();

        assert_eq!(receipt.recipients, 2);
        assert_eq!(
            controller.transport().sent(),
            vec![SentEmail {
                recipients: vec!["a@x.com".to_string(), "b@y.com".to_string()],
                subject: "Dinner on Friday?".to_string(),
                body: BODY.to_string(),
            }]
        );

        let snapshot = controller.snapshot();
        assert!(snapshot.sent);
        assert_eq!(snapshot.recipients, "");
        assert_eq!(snapshot.prompt, "");
        assert!(snapshot.draft.is_empty());
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.send, OperationState::Succeeded);
    }

    #[tokio::test]
    async fn test_send_transport_failure_keeps_draft() {
        let controller = drafted(TransportBehavior::Reject, vec![]).await;
        controller.set_recipients("f@a.com");
        let before = controller.snapshot();

        let result = controller.send().await;

        assert!(matches!(result, Err(ComposerError::Transport(_))));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.error.as_deref(), Some("Mailbox quota exceeded"));
        assert_eq!(snapshot.draft, before.draft);
        assert_eq!(snapshot.recipients, "f@a.com");
        assert_eq!(snapshot.prompt, "invite a friend to dinner");
        assert!(!snapshot.sent);
        assert_eq!(snapshot.send, OperationState::Failed);
    }

    #[tokio::test]
    async fn test_send_unexpected_failures_are_generic() {
        for behavior in [TransportBehavior::Break, TransportBehavior::Panic] {
            let controller = drafted(behavior, vec![]).await;
            controller.set_recipients("f@a.com");

            let result = controller.send().await;

            assert!(matches!(result, Err(ComposerError::Unexpected(_))), "{:?}", behavior);
            let snapshot = controller.snapshot();
            assert_eq!(
                snapshot.error.as_deref(),
                Some("An unexpected error occurred while sending the email.")
            );
            assert_eq!(snapshot.draft.body, BODY);
            assert_eq!(snapshot.send, OperationState::Failed);
        }
    }

    #[tokio::test]
    async fn test_choose_suggestion_out_of_range() {
        let controller = drafted(TransportBehavior::Deliver, vec![]).await;

        assert_eq!(controller.choose_suggestion(2).unwrap(), "Friday dinner plans");
        assert!(matches!(controller.choose_suggestion(3), Err(ComposerError::Validation(_))));
        assert_eq!(controller.snapshot().draft.subject, "Friday dinner plans");
    }
}

#[tokio::test]
async fn test_dinner_invitation_scenario() {
    let controller = controller(
        vec![Ok(BODY.to_string()), Ok(SUBJECTS_JSON.to_string())],
        TransportBehavior::Deliver,
    );
    controller.set_prompt("invite a friend to dinner");

    controller.generate().await.unwrap();
    assert_eq!(controller.snapshot().draft.suggested_subjects.len(), 3);

    let subject = controller.choose_suggestion(0).unwrap();
    assert_eq!(subject, "Dinner on Friday?");

    controller.set_recipients("f@a.com");
    controller.send().await.unwrap();

    let snapshot = controller.snapshot();
    assert!(snapshot.sent);
    assert_eq!(snapshot.prompt, "");
    assert_eq!(snapshot.recipients, "");
    assert_eq!(snapshot.draft.subject, "");
    assert_eq!(snapshot.draft.body, "");
    assert!(snapshot.draft.suggested_subjects.is_empty());
    assert_eq!(snapshot.error, None);

    let sent = controller.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipients, vec!["f@a.com"]);
    assert_eq!(sent[0].subject, "Dinner on Friday?");
}
