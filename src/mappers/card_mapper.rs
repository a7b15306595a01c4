use crate::models::card::{CardAction, CardImage, HeroCard};
use crate::models::github_user::GithubUser;

/// Profile card shown once a user has been picked.
pub fn to_profile_card(user: &GithubUser) -> HeroCard {
    HeroCard {
        title: Some(user.login.clone()),
        subtitle: user.name.clone().filter(|name| !name.is_empty()),
        text: Some(profile_text(user)),
        images: vec![CardImage { url: user.avatar_url.clone() }],
        buttons: Vec::new(),
        tap: Some(CardAction::open_url(&user.html_url)),
    }
}

// Company and email each end a paragraph, bio closes the text.
fn profile_text(user: &GithubUser) -> String {
    let mut text = String::new();
    for field in [&user.company, &user.email] {
        if let Some(value) = field.as_deref().filter(|v| !v.is_empty()) {
            text.push_str(value);
            text.push_str("\n\n");
        }
    }
    if let Some(bio) = user.bio.as_deref() {
        text.push_str(bio);
    }
    text
}

/// Button list used to disambiguate search results.
pub fn to_choice_card(prompt: &str, choices: &[String]) -> HeroCard {
    HeroCard {
        text: Some(prompt.to_string()),
        buttons: choices.iter().map(|choice| CardAction::im_back(choice)).collect(),
        ..Default::default()
    }
}
