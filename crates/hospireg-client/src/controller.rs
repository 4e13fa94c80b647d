//! Drives the form: picking documents, validating, submitting and signalling the host.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use hospireg_core::DocumentKind;

use crate::error::{SelectionError, SubmitError};
use crate::form::{Platform, RegistrationForm, SelectedFile};
use crate::host::{FilePicker, UiHost};
use crate::transport::{SubmitReceipt, Transport};

pub const TITLE_ERROR: &str = "Error";
pub const TITLE_SUCCESS: &str = "Success";
pub const TITLE_IMAGE_SELECTED: &str = "Image Selected";
pub const MSG_PICK_FAILED: &str = "Failed to pick image";
pub const MSG_IMAGE_SELECTED: &str = "Image selected";
pub const MSG_INCOMPLETE_FORM: &str =
    "Please fill all fields and select all required documents.";
pub const MSG_SUBMITTED: &str = "Form submitted successfully!";
pub const MSG_SUBMIT_FAILED: &str = "Failed to submit form.";

/// Clears the in-flight flag when the submission settles, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RegistrationController {
    form: Mutex<RegistrationForm>,
    in_flight: AtomicBool,
    platform: Platform,
    picker: Arc<dyn FilePicker>,
    host: Arc<dyn UiHost>,
    transport: Arc<dyn Transport>,
}

impl RegistrationController {
    pub fn new(
        platform: Platform,
        picker: Arc<dyn FilePicker>,
        host: Arc<dyn UiHost>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            form: Mutex::new(RegistrationForm::new()),
            in_flight: AtomicBool::new(false),
            platform,
            picker,
            host,
            transport,
        }
    }

    // The form is plain data; a panic mid-edit leaves nothing half-updated worth refusing.
    fn form(&self) -> MutexGuard<'_, RegistrationForm> {
        self.form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current form.
    pub fn snapshot(&self) -> RegistrationForm {
        self.form().clone()
    }

    pub fn set_name(&self, name: &str) {
        self.form().set_name(name);
    }

    pub fn set_address_line(&self, index: usize, text: &str) {
        self.form().set_address_line(index, text);
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Ask the host picker for an image for `kind`. Cancelling keeps the previous selection.
    pub async fn select_document(
        &self,
        kind: DocumentKind,
    ) -> Result<Option<SelectedFile>, SelectionError> {
        let picked = match self.picker.pick_image(kind).await {
            Ok(Some(picked)) => picked,
            Ok(None) => {
                tracing::debug!(kind = %kind, "Image selection cancelled");
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Image picker failed");
                self.host.alert(TITLE_ERROR, MSG_PICK_FAILED);
                return Err(e);
            }
        };

        let message = picked
            .file_name
            .clone()
            .unwrap_or_else(|| MSG_IMAGE_SELECTED.to_string());
        let file = SelectedFile::from_picked(kind, picked);
        self.form().set_document(kind, file.clone());

        self.host.alert(TITLE_IMAGE_SELECTED, &message);
        Ok(Some(file))
    }

    /// Validate and send the form. On success the form is cleared and the host is told to
    /// show the dashboard; on failure everything entered is kept.
    pub async fn submit(&self) -> Result<SubmitReceipt, SubmitError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("Submission ignored, one is already in flight");
            return Err(SubmitError::InFlight);
        };

        let payload = {
            let form = self.form();
            form.to_payload(self.platform)
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "Form incomplete");
                self.host.alert(TITLE_ERROR, MSG_INCOMPLETE_FORM);
                return Err(SubmitError::Validation(e));
            }
        };

        match self.transport.submit(&payload).await {
            Ok(receipt) => {
                tracing::info!(
                    status = receipt.status,
                    inserted_id = ?receipt.inserted_id,
                    "Registration submitted"
                );
                self.host.alert(TITLE_SUCCESS, MSG_SUBMITTED);
                self.form().reset();
                self.host.navigate_to_dashboard();
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!(error = %e, "Registration submission failed");
                self.host.alert(TITLE_ERROR, MSG_SUBMIT_FAILED);
                Err(SubmitError::Transport(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::form::SubmissionPayload;
    use crate::host::PickedImage;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingHost {
        alerts: Mutex<Vec<(String, String)>>,
        navigations: Mutex<usize>,
    }

    impl RecordingHost {
        fn alerts(&self) -> Vec<(String, String)> {
            self.alerts.lock().unwrap().clone()
        }

        fn last_alert(&self) -> (String, String) {
            self.alerts().last().cloned().unwrap()
        }

        fn navigations(&self) -> usize {
            *self.navigations.lock().unwrap()
        }
    }

    impl UiHost for RecordingHost {
        fn alert(&self, title: &str, message: &str) {
            self.alerts
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
        }

        fn navigate_to_dashboard(&self) {
            *self.navigations.lock().unwrap() += 1;
        }
    }

    type PickResult = Result<Option<PickedImage>, SelectionError>;

    /// Answers picks from a script, then keeps returning images named after the kind.
    #[derive(Default)]
    struct ScriptedPicker {
        script: Mutex<VecDeque<PickResult>>,
    }

    impl ScriptedPicker {
        fn with(results: Vec<PickResult>) -> Self {
            Self {
                script: Mutex::new(results.into()),
            }
        }
    }

    #[async_trait]
    impl FilePicker for ScriptedPicker {
        async fn pick_image(&self, kind: DocumentKind) -> PickResult {
            if let Some(result) = self.script.lock().unwrap().pop_front() {
                return result;
            }
            Ok(Some(PickedImage {
                uri: format!("/sdcard/{}.jpg", kind),
                mime_type: None,
                file_name: None,
            }))
        }
    }

    struct MockTransport {
        calls: Mutex<Vec<SubmissionPayload>>,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl MockTransport {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail,
                gate: None,
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(false)
            }
        }

        fn calls(&self) -> Vec<SubmissionPayload> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn submit(
            &self,
            payload: &SubmissionPayload,
        ) -> Result<SubmitReceipt, TransportError> {
            self.calls.lock().unwrap().push(payload.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(TransportError::Status {
                    status: 500,
                    body: r#"{"success":false,"error":"Failed to access database"}"#.to_string(),
                });
            }
            Ok(SubmitReceipt {
                status: 200,
                inserted_id: Some(uuid::Uuid::new_v4()),
            })
        }
    }

    struct Harness {
        controller: Arc<RegistrationController>,
        host: Arc<RecordingHost>,
        transport: Arc<MockTransport>,
    }

    fn harness(picker: ScriptedPicker, transport: MockTransport) -> Harness {
        let host = Arc::new(RecordingHost::default());
        let transport = Arc::new(transport);
        let controller = Arc::new(RegistrationController::new(
            Platform::Android,
            Arc::new(picker),
            host.clone(),
            transport.clone(),
        ));
        Harness {
            controller,
            host,
            transport,
        }
    }

    async fn fill(controller: &RegistrationController) {
        controller.set_name("St. Mary");
        controller.set_address_line(0, "1 Main St");
        for kind in DocumentKind::ALL {
            controller.select_document(kind).await.unwrap();
        }
    }

    #[tokio::test]
    async fn selection_alerts_with_file_name_or_fallback() {
        let h = harness(
            ScriptedPicker::with(vec![Ok(Some(PickedImage {
                uri: "/sdcard/cert.png".to_string(),
                mime_type: Some("image/png".to_string()),
                file_name: Some("cert.png".to_string()),
            }))]),
            MockTransport::new(false),
        );

        let file = h
            .controller
            .select_document(DocumentKind::HospitalCert)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.display_name, "cert.png");
        assert_eq!(
            h.host.last_alert(),
            ("Image Selected".to_string(), "cert.png".to_string())
        );

        h.controller
            .select_document(DocumentKind::FireNoc)
            .await
            .unwrap();
        assert_eq!(
            h.host.last_alert(),
            ("Image Selected".to_string(), "Image selected".to_string())
        );
        assert_eq!(
            h.controller
                .snapshot()
                .document(DocumentKind::FireNoc)
                .unwrap()
                .display_name,
            "fireNOC.jpg"
        );
    }

    #[tokio::test]
    async fn cancelled_pick_keeps_previous_selection() {
        let h = harness(
            ScriptedPicker::with(vec![
                Ok(Some(PickedImage {
                    uri: "/sdcard/first.jpg".to_string(),
                    mime_type: None,
                    file_name: Some("first.jpg".to_string()),
                })),
                Ok(None),
            ]),
            MockTransport::new(false),
        );

        h.controller
            .select_document(DocumentKind::AmbulanceLicense)
            .await
            .unwrap();
        let cancelled = h
            .controller
            .select_document(DocumentKind::AmbulanceLicense)
            .await
            .unwrap();

        assert!(cancelled.is_none());
        assert_eq!(h.host.alerts().len(), 1);
        assert_eq!(
            h.controller
                .snapshot()
                .document(DocumentKind::AmbulanceLicense)
                .unwrap()
                .uri,
            "/sdcard/first.jpg"
        );
    }

    #[tokio::test]
    async fn picker_failure_alerts_and_leaves_state() {
        let h = harness(
            ScriptedPicker::with(vec![Err(SelectionError("permission denied".to_string()))]),
            MockTransport::new(false),
        );

        let result = h.controller.select_document(DocumentKind::HospitalCert).await;

        assert!(result.is_err());
        assert_eq!(
            h.host.last_alert(),
            ("Error".to_string(), "Failed to pick image".to_string())
        );
        assert!(h
            .controller
            .snapshot()
            .document(DocumentKind::HospitalCert)
            .is_none());
    }

    #[tokio::test]
    async fn incomplete_form_makes_no_request() {
        let h = harness(ScriptedPicker::default(), MockTransport::new(false));
        h.controller.set_name("St. Mary");
        h.controller.set_address_line(0, "1 Main St");
        for kind in &DocumentKind::ALL[..4] {
            h.controller.select_document(*kind).await.unwrap();
        }

        let result = h.controller.submit().await;

        assert!(matches!(result, Err(SubmitError::Validation(_))));
        assert!(h.transport.calls().is_empty());
        assert_eq!(
            h.host.last_alert(),
            (
                "Error".to_string(),
                "Please fill all fields and select all required documents.".to_string()
            )
        );
        assert!(!h.controller.is_submitting());
    }

    #[tokio::test]
    async fn successful_submit_resets_and_navigates() {
        let h = harness(ScriptedPicker::default(), MockTransport::new(false));
        fill(&h.controller).await;

        let receipt = h.controller.submit().await.unwrap();

        assert_eq!(receipt.status, 200);
        let calls = h.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].text_fields.len(), 2);
        assert_eq!(calls[0].files.len(), 5);
        assert_eq!(calls[0].files[0].uri, "file:///sdcard/hospitalCert.jpg");
        assert_eq!(
            h.host.last_alert(),
            ("Success".to_string(), "Form submitted successfully!".to_string())
        );
        assert_eq!(h.host.navigations(), 1);

        let form = h.controller.snapshot();
        assert!(form.name().is_empty());
        assert!(form.address().is_empty());
        assert_eq!(form.missing_documents().len(), 5);
    }

    #[tokio::test]
    async fn failed_submit_keeps_data() {
        let h = harness(ScriptedPicker::default(), MockTransport::new(true));
        fill(&h.controller).await;

        let result = h.controller.submit().await;

        assert!(matches!(result, Err(SubmitError::Transport(_))));
        assert_eq!(h.transport.calls().len(), 1);
        assert_eq!(
            h.host.last_alert(),
            ("Error".to_string(), "Failed to submit form.".to_string())
        );
        assert_eq!(h.host.navigations(), 0);

        let form = h.controller.snapshot();
        assert_eq!(form.name(), "St. Mary");
        assert!(form.missing_documents().is_empty());
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_refused() {
        let gate = Arc::new(Notify::new());
        let h = harness(ScriptedPicker::default(), MockTransport::gated(gate.clone()));
        fill(&h.controller).await;

        let controller = h.controller.clone();
        let first = tokio::spawn(async move { controller.submit().await });

        while h.transport.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(h.controller.is_submitting());
        assert!(matches!(
            h.controller.submit().await,
            Err(SubmitError::InFlight)
        ));

        gate.notify_one();
        first.await.unwrap().unwrap();

        assert_eq!(h.transport.calls().len(), 1);
        assert!(!h.controller.is_submitting());
    }
}
