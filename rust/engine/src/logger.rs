use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{HandResult, Payout};
use crate::player::{PlayerAction, Seat};

/// Records a single betting action during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: Seat,
    /// Street on which the action was taken (0..=3)
    pub street: u8,
    pub action: PlayerAction,
    /// Set when the opponent's own choice was illegal and this action replaced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituted_from: Option<PlayerAction>,
}

/// One seat's discard during a draw round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub seat: Seat,
    /// 1-based draw round
    pub draw: u8,
    pub discarded: usize,
}

/// Chip counts for both seats at one point in a hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stacks {
    pub player: u32,
    pub opponent: u32,
}

impl Stacks {
    pub fn total(&self) -> u64 {
        u64::from(self.player) + u64::from(self.opponent)
    }
}

/// Complete record of one hand: actions, draws, final cards and outcome.
/// Serialized one per line (JSONL) for hand history and stats.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Unique identifier for this hand (format: YYYYMMDD-NNNNNN)
    pub hand_id: String,
    /// Deck seed; replaying with it reproduces the deal and every draw
    pub seed: Option<u64>,
    pub starting_stacks: Stacks,
    pub actions: Vec<ActionRecord>,
    #[serde(default)]
    pub draws: Vec<DrawRecord>,
    pub player_hand: Vec<Card>,
    pub opponent_hand: Vec<Card>,
    /// Outcome for the player; `None` while the hand is in progress
    #[serde(default)]
    pub result: Option<HandResult>,
    #[serde(default)]
    pub payout: Option<Payout>,
    #[serde(default)]
    pub final_stacks: Option<Stacks>,
    /// Timestamp when the hand was logged (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

impl HandRecord {
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Chips the player won (positive) or lost over the hand.
    pub fn player_net(&self) -> Option<i64> {
        self.final_stacks
            .map(|end| i64::from(end.player) - i64::from(self.starting_stacks.player))
    }
}

pub fn format_hand_id(yyyymmdd: &str, seq: u64) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

pub fn today() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

/// Appends [`HandRecord`]s to a JSONL file.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    written: usize,
}

impl HandLogger {
    /// Creates (or truncates) the file, making parent directories as needed.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::ensure_parent(path.as_ref())?;
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            written: 0,
        })
    }

    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::ensure_parent(path.as_ref())?;
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            written: 0,
        })
    }

    /// Logger that serializes but writes nowhere.
    pub fn discard() -> Self {
        Self {
            writer: None,
            written: 0,
        }
    }

    fn ensure_parent(path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_ids_are_zero_padded() {
        assert_eq!(format_hand_id("20260102", 7), "20260102-000007");
    }

    #[test]
    fn stack_total_widens_past_u32() {
        let s = Stacks {
            player: u32::MAX,
            opponent: u32::MAX,
        };
        assert_eq!(s.total(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn net_is_measured_from_the_starting_stack() {
        let rec = HandRecord {
            hand_id: "x".into(),
            seed: None,
            starting_stacks: Stacks {
                player: 100,
                opponent: 100,
            },
            actions: Vec::new(),
            draws: Vec::new(),
            player_hand: Vec::new(),
            opponent_hand: Vec::new(),
            result: Some(HandResult::Lose),
            payout: None,
            final_stacks: Some(Stacks {
                player: 99,
                opponent: 101,
            }),
            ts: None,
        };
        assert_eq!(rec.player_net(), Some(-1));
        assert!(rec.is_complete());
    }
}
