use crate::models::{Alert, Blogpost, Metadata};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// The launcher's birthday (month, day)
const BIRTHDAY: (u32, u32) = (7, 29);

/// Days around the birthday during which the birthday card is shown
const BIRTHDAY_WINDOW_DAYS: i64 = 10;

/// One card of the news feed, in display order
#[derive(Debug, Clone, PartialEq)]
pub enum NewsCard {
    Alert { name: String, text: String },
    /// Signed days until the birthday; negative once it has passed
    Birthday { days_until: i64 },
    Post {
        title: String,
        excerpt: String,
        image: String,
        link: Option<String>,
    },
    /// A post only the official launcher can show
    OfficialOnly { title: String },
    Empty,
}

/// News feed rebuilt from the live metadata whenever an API becomes ready
#[derive(Debug, Clone, Default)]
pub struct NewsPage {
    cards: Vec<NewsCard>,
    generation: u64,
}

impl NewsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[NewsCard] {
        &self.cards
    }

    /// Generation of the metadata the cards were built from
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace every card with ones built from `metadata`
    pub fn rebuild(&mut self, generation: u64, metadata: &Metadata, today: NaiveDate) {
        let mut cards = Vec::new();

        if let Some(alert) = &metadata.alert {
            tracing::info!("{}: {}", alert.name, alert.text);
            cards.push(alert_card(alert));
        }

        let days = days_until_birthday(today);
        if days.abs() <= BIRTHDAY_WINDOW_DAYS {
            cards.push(NewsCard::Birthday { days_until: days });
        }

        if metadata.blogposts.is_empty() {
            cards.push(NewsCard::Empty);
        } else {
            cards.extend(metadata.blogposts.iter().map(post_card));
        }

        tracing::debug!(
            "News page rebuilt for generation {} with {} cards",
            generation,
            cards.len()
        );
        self.cards = cards;
        self.generation = generation;
    }
}

impl fmt::Display for NewsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== News ==")?;
        for card in &self.cards {
            match card {
                NewsCard::Alert { name, text } => writeln!(f, "[!] {}: {}", name, text)?,
                NewsCard::Birthday { days_until } => match *days_until {
                    0 => writeln!(
                        f,
                        "[*] Happy birthday! The launcher turns another year older today"
                    )?,
                    d if d > 0 => writeln!(f, "[*] {} days until the launcher's birthday", d)?,
                    d => writeln!(f, "[*] The launcher's birthday was {} days ago", -d)?,
                },
                NewsCard::Post {
                    title,
                    excerpt,
                    link,
                    ..
                } => {
                    writeln!(f, "- {}", title)?;
                    if !excerpt.is_empty() {
                        writeln!(f, "  {}", excerpt)?;
                    }
                    if let Some(link) = link {
                        writeln!(f, "  {}", link)?;
                    }
                }
                NewsCard::OfficialOnly { title } => {
                    writeln!(f, "- {} (open the official launcher to read this post)", title)?
                }
                NewsCard::Empty => writeln!(f, "No news right now.")?,
            }
        }
        Ok(())
    }
}

fn alert_card(alert: &Alert) -> NewsCard {
    NewsCard::Alert {
        name: alert.name.clone(),
        text: alert.text.clone(),
    }
}

fn post_card(post: &Blogpost) -> NewsCard {
    match &post.image {
        Some(image) => NewsCard::Post {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            image: image.clone(),
            link: post.link.clone(),
        },
        None => {
            tracing::warn!("Failed to load news {}: no image", post.title);
            NewsCard::OfficialOnly {
                title: post.title.clone(),
            }
        }
    }
}

/// Days from `today` to this year's birthday, negative once passed
pub fn days_until_birthday(today: NaiveDate) -> i64 {
    let (month, day) = BIRTHDAY;
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(birthday) => (birthday - today).num_days(),
        None => i64::MAX,
    }
}
