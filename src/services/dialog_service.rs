use chrono::{Duration, Utc};
use handlebars::Handlebars;
use serde_json::json;

use crate::errors::Result;
use crate::mappers::{card_mapper, conversation_mapper};
use crate::models::activity::{Activity, Attachment};
use crate::models::dialog_state::DialogState;
use crate::models::intent::{ENTITY_QUERY, INTENT_SEARCH_PROFILE};
use crate::repositories::conversation_repository::ConversationRepository;
use crate::services::github_user_service::GitHubUserService;
use crate::services::recognizer_service::{Recognizer, INTENT_THRESHOLD};
use crate::templates;
use crate::validators;

/// Largest result set the bot will offer as a choice list.
pub const MAX_RESULTS: u64 = 10;
const CANCEL_COMMAND: &str = "cancel";
const EXPECTING_INPUT: &str = "expectingInput";
const LAYOUT_LIST: &str = "list";

/// The search dialog: collect a query, disambiguate the results, render the
/// chosen profile.
pub struct DialogService {
    pub github_user_service: GitHubUserService,
    pub recognizer: Recognizer,
    pub repository: ConversationRepository,
    pub replies: Handlebars<'static>,
    pub dialog_timeout: Duration,
}

impl DialogService {
    /// Like [`DialogService::handle`], but a failed turn resets the
    /// conversation and apologises instead of surfacing the error.
    pub async fn respond(&self, activity: &Activity) -> Vec<Activity> {
        match self.handle(activity).await {
            Ok(replies) => replies,
            Err(err) => {
                log::error!("Dialog failed: {}", err);
                if let Some(id) = activity.conversation_id() {
                    if let Err(err) = self.repository.delete(id).await {
                        log::error!("Failed to reset conversation {}: {}", id, err);
                    }
                }
                match self.message(templates::DIALOG_ERROR) {
                    Ok(reply) => vec![reply],
                    Err(err) => {
                        log::error!("{}", err);
                        Vec::new()
                    }
                }
            }
        }
    }

    #[tracing::instrument(skip_all, fields(conversation = activity.conversation_id()))]
    pub async fn handle(&self, activity: &Activity) -> Result<Vec<Activity>> {
        if !activity.is_message() {
            log::debug!("Ignoring {} activity", activity.activity_type);
            return Ok(Vec::new());
        }
        let id = match activity.conversation_id() {
            Some(id) => id,
            None => {
                log::warn!("Message without a conversation, ignoring");
                return Ok(Vec::new());
            }
        };
        let text = activity.trimmed_text();

        match self.load_state(id).await? {
            None => self.begin(id, text).await,
            Some(DialogState::AwaitingQuery) => self.search(id, text).await,
            Some(DialogState::AwaitingChoice { usernames }) => self.choose(id, text, &usernames).await,
        }
    }

    async fn load_state(&self, id: &str) -> Result<Option<DialogState>> {
        let stored = match self.repository.get_by_id(id).await? {
            Some(stored) => stored,
            None => return Ok(None),
        };
        if stored.expiration <= Utc::now().timestamp() {
            log::info!("Dialog for {} expired", id);
            self.repository.delete(id).await?;
            return Ok(None);
        }
        Ok(Some(conversation_mapper::to_model(&stored)?))
    }

    async fn save_state(&self, id: &str, state: &DialogState) -> Result<()> {
        let expiration = (Utc::now() + self.dialog_timeout).timestamp();
        self.repository.upsert(conversation_mapper::to_entity(id, state, expiration)?).await
    }

    // The recognizer only runs while no dialog is active.
    async fn begin(&self, id: &str, text: &str) -> Result<Vec<Activity>> {
        let result = self.recognizer.recognize(text).await?;
        if !result.matches(INTENT_SEARCH_PROFILE, INTENT_THRESHOLD) {
            return self.end_conversation(id, vec![self.message(templates::GREETING)?]).await;
        }

        match result.find_entity(ENTITY_QUERY) {
            Some(query) => self.search(id, &query.entity).await,
            None => {
                self.save_state(id, &DialogState::AwaitingQuery).await?;
                Ok(vec![self.prompt(templates::ASK_QUERY)?])
            }
        }
    }

    async fn search(&self, id: &str, query: &str) -> Result<Vec<Activity>> {
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        if query.is_empty() || query.eq_ignore_ascii_case(CANCEL_COMMAND) {
            return self.end_dialog(id, vec![self.message(templates::CANCELLED)?]).await;
        }
        if !validators::is_search_query(&query) {
            self.save_state(id, &DialogState::AwaitingQuery).await?;
            return Ok(vec![self.prompt(templates::QUERY_TOO_LONG)?]);
        }

        let result = self.github_user_service.search(&query).await?;
        let usernames = result.logins();
        if result.total_count == 0 || usernames.is_empty() {
            return self.end_dialog(id, vec![self.message(templates::NO_RESULTS)?]).await;
        }
        if result.total_count > MAX_RESULTS {
            return self.end_dialog(id, vec![self.message(templates::TOO_MANY_RESULTS)?]).await;
        }

        let prompt = self.choice_prompt(templates::CHOOSE_USER, &usernames)?;
        self.save_state(id, &DialogState::AwaitingChoice { usernames }).await?;
        Ok(vec![prompt])
    }

    async fn choose(&self, id: &str, text: &str, usernames: &[String]) -> Result<Vec<Activity>> {
        if text.eq_ignore_ascii_case(CANCEL_COMMAND) {
            return self.end_dialog(id, vec![self.message(templates::CANCELLED)?]).await;
        }

        let login = match match_choice(text, usernames) {
            Some(login) => login,
            None => {
                // Re-saving pushes the expiration forward.
                let state = DialogState::AwaitingChoice { usernames: usernames.to_vec() };
                self.save_state(id, &state).await?;
                return Ok(vec![self.choice_prompt(templates::CHOICE_RETRY, usernames)?]);
            }
        };

        let profile = self.github_user_service.load_profile(login).await?;
        let card = card_mapper::to_profile_card(&profile);
        let reply = Activity {
            text: None,
            attachments: vec![Attachment::hero(&card)?],
            ..Activity::message("")
        };
        self.end_conversation(id, vec![Activity::typing(), reply]).await
    }

    async fn end_dialog(&self, id: &str, replies: Vec<Activity>) -> Result<Vec<Activity>> {
        self.repository.delete(id).await?;
        Ok(replies)
    }

    async fn end_conversation(&self, id: &str, mut replies: Vec<Activity>) -> Result<Vec<Activity>> {
        replies.push(Activity::end_of_conversation());
        self.end_dialog(id, replies).await
    }

    fn render(&self, template: &str) -> Result<String> {
        Ok(self.replies.render(template, &json!({ "max_results": MAX_RESULTS }))?)
    }

    fn message(&self, template: &str) -> Result<Activity> {
        Ok(Activity::message(self.render(template)?))
    }

    fn prompt(&self, template: &str) -> Result<Activity> {
        Ok(Activity {
            input_hint: Some(EXPECTING_INPUT.into()),
            ..self.message(template)?
        })
    }

    fn choice_prompt(&self, template: &str, usernames: &[String]) -> Result<Activity> {
        let card = card_mapper::to_choice_card(&self.render(template)?, usernames);
        Ok(Activity {
            text: None,
            input_hint: Some(EXPECTING_INPUT.into()),
            attachment_layout: Some(LAYOUT_LIST.into()),
            attachments: vec![Attachment::hero(&card)?],
            ..Activity::message("")
        })
    }
}

/// Resolve a reply to one of the offered logins, by name or 1-based position.
pub fn match_choice<'a>(text: &str, choices: &'a [String]) -> Option<&'a String> {
    let text = text.trim();
    if let Some(choice) = choices.iter().find(|choice| choice.eq_ignore_ascii_case(text)) {
        return Some(choice);
    }
    match text.trim_end_matches('.').parse::<usize>() {
        Ok(index) if index >= 1 => choices.get(index - 1),
        _ => None,
    }
}
