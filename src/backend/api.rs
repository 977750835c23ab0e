// src/backend/api.rs
// Candid endpoint definitions (query/update functions)

use crate::{
    error::PageError,
    metrics::{self, PageMetrics},
    models::{
        common::*,
        draft::{BasicInfo, Draft},
        memory_item::FileCandidate,
        page_record::PageRecord,
        template::{self, TemplateSummary},
    },
    services::{
        lifecycle::PageLifecycle,
        media_service::MoveDirection,
        media_validator::MediaBatchOutcome,
        session::{SessionGate, SessionUser},
        wizard::{CheckoutHandoff, StyleOverrides, WizardController, WizardStep},
    },
    storage::{config, wizard_sessions, DocumentStore, StableDocumentStore},
    utils::{
        crypto::generate_id,
        guards::{admin_guard, caller_session},
        log,
        time::get_current_time_ns,
    },
};
use candid::{CandidType, Deserialize};
use ic_cdk_macros::{query, update};
use validator::{Validate, ValidationError};

// --- Validation Helpers ---

fn validate_request<T: Validate>(req: &T) -> Result<(), PageError> {
    req.validate().map_err(|e| PageError::InvalidInput(e.to_string()))
}

/// Accepts `YYYY-MM-DD` with a plausible month and day.
fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = value.split('-').collect();
    let well_formed = parts.len() == 3
        && parts[0].len() == 4
        && parts[1].len() == 2
        && parts[2].len() == 2
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()));
    if !well_formed {
        return Err(ValidationError::new("iso_date"));
    }
    let month: u32 = parts[1].parse().map_err(|_| ValidationError::new("iso_date"))?;
    let day: u32 = parts[2].parse().map_err(|_| ValidationError::new("iso_date"))?;
    if (1..=12).contains(&month) && (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(ValidationError::new("iso_date"))
    }
}

/// Accepts `#rgb` or `#rrggbb`.
fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('#').ok_or_else(|| ValidationError::new("hex_color"))?;
    if (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}

// --- Request/Response Structs ---

// Fields may be blank: the wizard never blocks on incomplete steps.
#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct BasicInfoRequest {
    #[validate(length(max = 120))]
    pub name: String,
    #[validate(custom(function = "validate_iso_date"))]
    pub birth_date: Option<String>,
    #[validate(custom(function = "validate_iso_date"))]
    pub death_date: Option<String>,
    #[validate(length(max = 5000))]
    pub bio: String,
    #[validate(length(min = 1, max = 512))]
    pub profile_photo: Option<String>,
    #[validate(length(min = 1, max = 512))]
    pub cover_photo: Option<String>,
}

impl From<BasicInfoRequest> for BasicInfo {
    fn from(req: BasicInfoRequest) -> Self {
        Self {
            name: req.name,
            birth_date: req.birth_date,
            death_date: req.death_date,
            bio: req.bio,
            profile_photo: req.profile_photo,
            cover_photo: req.cover_photo,
        }
    }
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct DisplayOptionsRequest {
    pub show_dates: bool,
    pub allow_comments: bool,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct StyleRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub background_color: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub accent_color: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub font_family: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub layout: Option<String>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct AddMediaRequest {
    #[validate(length(max = 20))]
    pub files: Vec<FileCandidate>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct MoveMediaRequest {
    pub media_id: MemoryId,
    pub direction: MoveDirection,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct DescribeMediaRequest {
    pub media_id: MemoryId,
    #[validate(length(max = 500))]
    pub description: String,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct WizardView {
    pub step: WizardStep,
    pub draft: Draft,
    pub editing_page_id: Option<PageId>,
    pub can_go_back: bool,
    pub can_go_next: bool,
}

impl From<&WizardController> for WizardView {
    fn from(wizard: &WizardController) -> Self {
        Self {
            step: wizard.step(),
            draft: wizard.draft().clone(),
            editing_page_id: wizard.editing().cloned(),
            can_go_back: wizard.step().previous().is_some(),
            can_go_next: wizard.step().next().is_some(),
        }
    }
}

// --- Session Helpers ---

fn current_user() -> Result<SessionUser, PageError> {
    caller_session().require_user().cloned()
}

/// Mutates the caller's wizard and returns its new state.
fn update_wizard<F>(f: F) -> Result<WizardView, PageError>
where
    F: FnOnce(&mut WizardController) -> Result<(), PageError>,
{
    let user = current_user()?;
    wizard_sessions::with_session_mut(&user.principal, get_current_time_ns(), |wizard| {
        f(wizard)?;
        Ok(WizardView::from(&*wizard))
    })
}

// --- Wizard Endpoints ---

#[update]
fn wizard_start() -> Result<WizardView, PageError> {
    let user = current_user()?;
    let wizard = WizardController::new();
    let view = WizardView::from(&wizard);
    wizard_sessions::start(user.principal, wizard, get_current_time_ns());
    Ok(view)
}

#[update]
async fn wizard_edit(page_id: PageId) -> Result<WizardView, PageError> {
    let session = caller_session();
    let user = session.require_user()?.clone();
    let mut manager = PageLifecycle::new(StableDocumentStore);
    let record = manager.fetch(&page_id).await?;
    session.ensure_can_manage(&record.owner)?;

    let wizard = WizardController::from_record(&record);
    let view = WizardView::from(&wizard);
    wizard_sessions::start(user.principal, wizard, get_current_time_ns());
    Ok(view)
}

#[query]
fn wizard_state() -> Result<WizardView, PageError> {
    let user = current_user()?;
    wizard_sessions::with_session(&user.principal, |wizard| Ok(WizardView::from(wizard)))
}

#[update]
fn wizard_next() -> Result<WizardView, PageError> {
    update_wizard(|wizard| {
        wizard.go_next();
        Ok(())
    })
}

#[update]
fn wizard_back() -> Result<WizardView, PageError> {
    update_wizard(|wizard| {
        wizard.go_back();
        Ok(())
    })
}

#[update]
fn wizard_jump(step: WizardStep) -> Result<WizardView, PageError> {
    update_wizard(|wizard| {
        wizard.jump_to(step);
        Ok(())
    })
}

#[update]
fn wizard_select_template(template_id: String) -> Result<WizardView, PageError> {
    update_wizard(|wizard| wizard.select_template(&template_id))
}

#[update]
fn wizard_update_basic_info(req: BasicInfoRequest) -> Result<WizardView, PageError> {
    validate_request(&req)?;
    update_wizard(|wizard| {
        wizard.update_basic_info(req.into());
        Ok(())
    })
}

#[update]
fn wizard_update_display(req: DisplayOptionsRequest) -> Result<WizardView, PageError> {
    update_wizard(|wizard| {
        wizard.update_display_options(req.show_dates, req.allow_comments);
        Ok(())
    })
}

#[update]
fn wizard_update_style(req: StyleRequest) -> Result<WizardView, PageError> {
    validate_request(&req)?;
    update_wizard(|wizard| {
        wizard.update_style(StyleOverrides {
            background_color: req.background_color,
            accent_color: req.accent_color,
            font_family: req.font_family,
            layout: req.layout,
        });
        Ok(())
    })
}

#[update]
fn wizard_add_media(req: AddMediaRequest) -> Result<MediaBatchOutcome, PageError> {
    validate_request(&req)?;
    let user = current_user()?;
    let now = get_current_time_ns();
    let outcome = wizard_sessions::with_session_mut(&user.principal, now, |wizard| {
        Ok(wizard.add_media(&req.files, || generate_id("media", &user.principal, now)))
    })?;
    metrics::record_media_batch(&outcome);
    if !outcome.rejected.is_empty() || outcome.video_limit_reached {
        log::info(format!(
            "Media batch for {}: {} accepted, {} rejected, video limit reached: {}",
            user.principal,
            outcome.accepted.len(),
            outcome.rejected.len(),
            outcome.video_limit_reached
        ));
    }
    Ok(outcome)
}

#[update]
fn wizard_remove_media(media_id: MemoryId) -> Result<WizardView, PageError> {
    update_wizard(|wizard| wizard.remove_media(&media_id))
}

#[update]
fn wizard_move_media(req: MoveMediaRequest) -> Result<WizardView, PageError> {
    update_wizard(|wizard| wizard.move_media(&req.media_id, req.direction))
}

#[update]
fn wizard_toggle_media(media_id: MemoryId) -> Result<WizardView, PageError> {
    update_wizard(|wizard| wizard.toggle_media(&media_id).map(|_| ()))
}

#[update]
fn wizard_describe_media(req: DescribeMediaRequest) -> Result<WizardView, PageError> {
    validate_request(&req)?;
    update_wizard(|wizard| wizard.describe_media(&req.media_id, req.description))
}

#[query]
fn wizard_checkout() -> Result<CheckoutHandoff, PageError> {
    let user = current_user()?;
    wizard_sessions::with_session(&user.principal, |wizard| wizard.proceed_to_checkout())
}

/// Ends `owner`'s wizard and persists its draft. The session is gone
/// afterwards whether or not the save succeeds.
async fn finish_wizard<S: DocumentStore>(
    store: &S,
    owner: PrincipalId,
    now: TimestampNs,
) -> Result<PageId, PageError> {
    let wizard = wizard_sessions::take(&owner)?;
    let is_new = wizard.editing().is_none();

    let result = wizard.save_draft(store, owner, now).await;
    match &result {
        Ok(_) if is_new => metrics::record_page_created(),
        Ok(_) => {}
        Err(e) => log::error(format!("Saving draft for {} failed: {}", owner, e)),
    }
    result
}

#[update]
async fn wizard_save_draft() -> Result<PageId, PageError> {
    let user = current_user()?;
    finish_wizard(&StableDocumentStore, user.principal, get_current_time_ns()).await
}

#[update]
fn wizard_discard() -> Result<bool, PageError> {
    let user = current_user()?;
    Ok(wizard_sessions::discard(&user.principal))
}

// --- Page Endpoints ---

#[query]
async fn get_page(page_id: PageId) -> Result<PageRecord, PageError> {
    let session = caller_session();
    let mut manager = PageLifecycle::new(StableDocumentStore);
    let record = manager.fetch(&page_id).await?;
    session.ensure_can_manage(&record.owner)?;
    Ok(record)
}

#[query]
async fn list_my_pages() -> Result<Vec<PageRecord>, PageError> {
    let user = current_user()?;
    PageLifecycle::new(StableDocumentStore)
        .list_owned(&user.principal)
        .await
}

/// Public page view; no sign-in required.
#[query]
async fn view_page(slug: String) -> Result<PageRecord, PageError> {
    PageLifecycle::new(StableDocumentStore).view_published(&slug).await
}

async fn change_status(page_id: PageId, status: PageStatus) -> Result<PageRecord, PageError> {
    let session = caller_session();
    let mut manager = PageLifecycle::new(StableDocumentStore);
    let record = manager.fetch(&page_id).await?;
    session.ensure_can_manage(&record.owner)?;

    let now = get_current_time_ns();
    match status {
        PageStatus::Published => manager.publish(&page_id, now).await?,
        PageStatus::Unpublished => manager.unpublish(&page_id, now).await?,
        PageStatus::Draft => {
            return Err(PageError::InvalidInput(
                "pages cannot be moved back to draft".to_string(),
            ))
        }
    };
    metrics::record_status_change(status);

    manager
        .local(&page_id)
        .cloned()
        .ok_or_else(|| PageError::InternalError(format!("Page {} missing from local copy", page_id)))
}

#[update]
async fn publish_page(page_id: PageId) -> Result<PageRecord, PageError> {
    change_status(page_id, PageStatus::Published).await
}

#[update]
async fn unpublish_page(page_id: PageId) -> Result<PageRecord, PageError> {
    change_status(page_id, PageStatus::Unpublished).await
}

#[update]
async fn delete_page(page_id: PageId) -> Result<(), PageError> {
    let session = caller_session();
    let mut manager = PageLifecycle::new(StableDocumentStore);
    let record = manager.fetch(&page_id).await?;
    session.ensure_can_manage(&record.owner)?;

    manager.remove(&page_id).await?;
    metrics::record_page_deleted();
    Ok(())
}

/// Link for the clipboard: `<origin>/memory/<slug>`.
#[query]
async fn share_url(page_id: PageId) -> Result<String, PageError> {
    let session = caller_session();
    let mut manager = PageLifecycle::new(StableDocumentStore);
    let record = manager.fetch(&page_id).await?;
    session.ensure_can_manage(&record.owner)?;
    Ok(record.share_url(&config::get_site_origin()))
}

// --- Misc Endpoints ---

#[query]
fn list_templates() -> Vec<TemplateSummary> {
    template::all().iter().map(TemplateSummary::from).collect()
}

#[query]
fn whoami() -> SessionGate {
    caller_session().gate()
}

/// Ends the caller's editing session. Identity itself lives with the client's
/// auth provider, so this only drops server-side wizard state.
#[update]
fn sign_out() -> bool {
    let mut session = caller_session();
    let discarded = session
        .user()
        .map(|user| wizard_sessions::discard(&user.principal))
        .unwrap_or(false);
    session.sign_out();
    discarded
}

#[query(guard = "admin_guard")]
fn get_metrics() -> PageMetrics {
    metrics::get_page_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Collection;
    use candid::Principal;
    use futures::executor::block_on;
    use serde_json::{Map, Value};

    #[test]
    fn iso_dates() {
        assert!(validate_iso_date("1948-05-14").is_ok());
        assert!(validate_iso_date("1948-13-01").is_err());
        assert!(validate_iso_date("1948-5-14").is_err());
        assert!(validate_iso_date("14/05/1948").is_err());
    }

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("#2563eb").is_ok());
        assert!(validate_hex_color("2563eb").is_err());
        assert!(validate_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn basic_info_request_allows_blank_fields() {
        let req = BasicInfoRequest {
            name: String::new(),
            birth_date: None,
            death_date: None,
            bio: String::new(),
            profile_photo: None,
            cover_photo: None,
        };
        assert!(validate_request(&req).is_ok());

        let bad = BasicInfoRequest {
            birth_date: Some("yesterday".to_string()),
            ..req
        };
        assert!(matches!(validate_request(&bad), Err(PageError::InvalidInput(_))));
    }

    #[test]
    fn style_request_checks_colors() {
        let req = StyleRequest {
            background_color: Some("#000".to_string()),
            accent_color: Some("red".to_string()),
            font_family: None,
            layout: None,
        };
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn empty_media_batch_is_a_no_op() {
        let req = AddMediaRequest { files: vec![] };
        assert!(validate_request(&req).is_ok());

        let mut wizard = WizardController::new();
        let outcome = wizard.add_media(&req.files, || "unused".to_string());
        assert_eq!(outcome, MediaBatchOutcome::default());
        assert!(wizard.draft().memories.is_empty());
    }

    /// Store whose every call fails.
    struct UnavailableStore;

    impl DocumentStore for UnavailableStore {
        async fn get(&self, _: Collection, _: &str) -> Result<Option<Value>, PageError> {
            Err(PageError::StorageError("unavailable".to_string()))
        }

        async fn set(&self, _: Collection, _: &str, _: Value) -> Result<(), PageError> {
            Err(PageError::StorageError("unavailable".to_string()))
        }

        async fn update(&self, _: Collection, _: &str, _: Map<String, Value>) -> Result<(), PageError> {
            Err(PageError::StorageError("unavailable".to_string()))
        }

        async fn delete(&self, _: Collection, _: &str) -> Result<(), PageError> {
            Err(PageError::StorageError("unavailable".to_string()))
        }

        async fn list(&self, _: Collection) -> Result<Vec<(String, Value)>, PageError> {
            Err(PageError::StorageError("unavailable".to_string()))
        }
    }

    fn principal(byte: u8) -> Principal {
        Principal::from_slice(&[byte; 29])
    }

    #[test]
    fn failed_save_still_ends_the_wizard() {
        let owner = principal(9);
        wizard_sessions::start(owner, WizardController::new(), 1);

        let err = block_on(finish_wizard(&UnavailableStore, owner, 2)).unwrap_err();
        assert_eq!(err, PageError::StorageError("unavailable".to_string()));
        assert_eq!(
            wizard_sessions::with_session(&owner, |_| Ok(())),
            Err(PageError::SessionNotFound)
        );
        assert_eq!(metrics::get_page_metrics().pages_created, 0);
    }

    #[test]
    fn saving_a_new_page_ends_the_wizard_and_counts_it() {
        let owner = principal(10);
        wizard_sessions::start(owner, WizardController::new(), 1);

        let id = block_on(finish_wizard(&StableDocumentStore, owner, 2)).unwrap();
        assert!(block_on(StableDocumentStore.get(Collection::MemorialPages, &id))
            .unwrap()
            .is_some());
        assert_eq!(wizard_sessions::take(&owner), Err(PageError::SessionNotFound));
        assert_eq!(metrics::get_page_metrics().pages_created, 1);
        assert_eq!(
            block_on(finish_wizard(&StableDocumentStore, owner, 3)),
            Err(PageError::SessionNotFound)
        );
    }

    #[test]
    fn wizard_view_reflects_navigation_bounds() {
        let mut wizard = WizardController::new();
        let view = WizardView::from(&wizard);
        assert!(!view.can_go_back);
        assert!(view.can_go_next);
        while wizard.go_next() {}
        let view = WizardView::from(&wizard);
        assert_eq!(view.step, WizardStep::Preview);
        assert!(!view.can_go_next);
    }
}
