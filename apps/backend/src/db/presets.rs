//! Built-in vocabulary lists seeded at startup

use super::Database;
use crate::error::Result;

/// Arbitrary key for the advisory lock held while seeding
const SEED_LOCK_KEY: i64 = 0x6c65_7869_636f_6e;

/// `(word, part of speech, definition, example)`
type PresetWord = (&'static str, &'static str, &'static str, &'static str);

pub struct PresetList {
    pub name: &'static str,
    pub description: &'static str,
    pub language: &'static str,
    pub words: &'static [PresetWord],
}

pub const PRESET_LISTS: &[PresetList] = &[
    PresetList {
        name: "Basic English",
        description: "Everyday words for beginners",
        language: "en",
        words: &[
            ("apple", "n.", "a round fruit with red or green skin", "I eat an apple every day."),
            ("book", "n.", "a set of printed pages bound together", "She is reading a book."),
            ("computer", "n.", "an electronic machine that processes data", "My computer is new."),
            ("friend", "n.", "a person you know well and like", "He is my best friend."),
            ("home", "n.", "the place where you live", "Let's go home."),
            ("study", "v.", "to spend time learning about a subject", "I study English at night."),
            ("work", "v./n.", "to do a job; the job itself", "She works in a hospital."),
            ("love", "v./n.", "to care for deeply; a deep affection", "I love my family."),
            ("time", "n.", "the passing of minutes, hours and days", "What time is it?"),
            ("day", "n.", "a period of twenty-four hours", "Have a nice day."),
        ],
    },
    PresetList {
        name: "Travel English",
        description: "Words for getting around on a trip",
        language: "en",
        words: &[
            ("airport", "n.", "a place where planes take off and land", "We arrived at the airport early."),
            ("hotel", "n.", "a building where travellers pay to stay", "Our hotel is near the beach."),
            ("ticket", "n.", "a paper or pass that lets you travel or enter", "I bought a train ticket."),
            ("tour", "n./v.", "a trip visiting several places", "We took a city tour."),
            ("restaurant", "n.", "a place where you buy and eat meals", "The restaurant opens at six."),
            ("map", "n.", "a drawing of an area showing roads and places", "Check the map before we leave."),
            ("camera", "n.", "a device for taking photographs", "Don't forget your camera."),
            ("luggage", "n.", "the bags you carry when travelling", "My luggage is too heavy."),
            ("passport", "n.", "an official document for travelling abroad", "Show your passport at the gate."),
            ("destination", "n.", "the place you are travelling to", "Paris is our final destination."),
        ],
    },
    PresetList {
        name: "Business English",
        description: "Common words from the workplace",
        language: "en",
        words: &[
            ("meeting", "n.", "a gathering of people to discuss something", "The meeting starts at ten."),
            ("project", "n.", "a planned piece of work with a goal", "Our project is on schedule."),
            ("report", "n./v.", "a written account; to give an account", "Please send me the report."),
            ("deadline", "n.", "the time by which something must be done", "The deadline is Friday."),
            ("budget", "n.", "the money available for a purpose", "We are over budget."),
            ("client", "n.", "a person or company that buys a service", "The client approved the design."),
            ("contract", "n.", "a written legal agreement", "Both sides signed the contract."),
            ("proposal", "n.", "a plan or idea put forward for approval", "They accepted our proposal."),
            ("team", "n.", "a group of people working together", "Our team won the award."),
            ("strategy", "n.", "a plan for reaching a long-term goal", "We need a new marketing strategy."),
        ],
    },
];

impl Database {
    /// Insert the built-in preset lists unless any preset list already exists.
    ///
    /// Runs under a transaction-scoped advisory lock so concurrent starts
    /// seed once. Returns the number of lists inserted.
    pub async fn seed_preset_lists(&self) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM vocabulary_lists WHERE is_preset")
                .fetch_one(&mut *tx)
                .await?;
        if existing > 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        for preset in PRESET_LISTS {
            let list_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO vocabulary_lists (name, description, language, is_preset, is_public)
                VALUES ($1, $2, $3, TRUE, TRUE)
                RETURNING id
                "#,
            )
            .bind(preset.name)
            .bind(preset.description)
            .bind(preset.language)
            .fetch_one(&mut *tx)
            .await?;

            for &(word, part_of_speech, definition, example) in preset.words {
                sqlx::query(
                    r#"
                    INSERT INTO vocabulary_words (vocabulary_list_id, word, definition,
                                                  part_of_speech, example, language)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(list_id)
                .bind(word)
                .bind(definition)
                .bind(part_of_speech)
                .bind(example)
                .bind(preset.language)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::debug!(lists = PRESET_LISTS.len(), "seeded preset vocabulary lists");
        Ok(PRESET_LISTS.len())
    }
}
