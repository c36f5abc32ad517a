use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, anyhow};
use log::warn;

use crate::errors::SubtitleError;

// @module: Subtitle parsing, cue model and serialization

// @const: Timestamp line regex, accepts SRT comma and VTT period separators.
// Trailing VTT cue settings after the end timestamp are tolerated and dropped.
static TIMESTAMP_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2})[,.](\d{3})(?:\s.*)?$")
        .unwrap()
});

// @const: VTT-style timestamp (period sub-second separator), used for detection
static VTT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3}").unwrap()
});

/// Supported subtitle container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// SubRip: numbered blocks, comma sub-second separator
    Srt,
    /// WebVTT: `WEBVTT` header, period sub-second separator, optional cue identifiers
    Vtt,
}

impl SubtitleFormat {
    /// Detect the format from file content: VTT when the first non-blank line is
    /// the `WEBVTT` token or the first timestamp line uses a period separator.
    pub fn detect(content: &str) -> Self {
        for line in content.lines() {
            let trimmed = line.trim_start_matches('\u{feff}').trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with("WEBVTT") {
                return SubtitleFormat::Vtt;
            }
            break;
        }

        for line in content.lines() {
            if line.contains("-->") {
                if VTT_TIMESTAMP_REGEX.is_match(line) {
                    return SubtitleFormat::Vtt;
                }
                break;
            }
        }

        SubtitleFormat::Srt
    }

    /// Infer the format from a file extension
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "srt" => Some(SubtitleFormat::Srt),
            "vtt" => Some(SubtitleFormat::Vtt),
            _ => None,
        }
    }

    /// Canonical file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
        }
    }

    /// Sub-second separator used in timestamps
    pub fn subsecond_separator(&self) -> char {
        match self {
            SubtitleFormat::Srt => ',',
            SubtitleFormat::Vtt => '.',
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(SubtitleFormat::Srt),
            "vtt" => Ok(SubtitleFormat::Vtt),
            _ => Err(anyhow!("Invalid subtitle format: {}", s)),
        }
    }
}

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    // @field: Original sequence number (SRT) or ordinal position
    pub index: usize,

    // @field: Optional VTT cue identifier, preserved verbatim
    pub identifier: Option<String>,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Ordered text lines
    pub lines: Vec<String>,
}

impl SubtitleCue {
    /// Create a new cue; text is split into lines on `\n`
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: &str) -> Self {
        SubtitleCue {
            index,
            identifier: None,
            start_ms,
            end_ms,
            lines: text.lines().map(|l| l.to_string()).collect(),
        }
    }

    /// Cue duration in milliseconds; zero for inverted ranges
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Joined text with `\n` between lines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Parse a single `HH:MM:SS{,|.}mmm` timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse()?;
        let minutes: u64 = parts[1].parse()?;
        let seconds: u64 = parts[2].parse()?;
        let millis: u64 = parts[3].parse()?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a timestamp in milliseconds to canonical zero-padded form
    pub fn format_timestamp(ms: u64, format: SubtitleFormat) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!(
            "{:02}:{:02}:{:02}{}{:03}",
            hours,
            minutes,
            seconds,
            format.subsecond_separator(),
            millis
        )
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_ms, SubtitleFormat::Srt),
            Self::format_timestamp(self.end_ms, SubtitleFormat::Srt)
        )?;
        writeln!(f, "{}", self.text())?;
        writeln!(f)
    }
}

/// Collection of subtitle cues with source metadata
#[derive(Debug)]
pub struct CueCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Detected input format
    pub format: SubtitleFormat,

    /// Ordered cues
    pub cues: Vec<SubtitleCue>,
}

impl CueCollection {
    /// Parse subtitle content, detecting the format from the text itself
    pub fn parse(content: &str, source_file: PathBuf) -> Result<Self, SubtitleError> {
        let format = SubtitleFormat::detect(content);
        let cues = Self::parse_with_format(content, format)?;
        Ok(CueCollection {
            source_file,
            format,
            cues,
        })
    }

    /// Parse subtitle content as the given format.
    ///
    /// Any block without a well-formed timestamp line is a fatal `ParseError`
    /// carrying the block and line number; nothing is salvaged from a broken file.
    pub fn parse_with_format(
        content: &str,
        format: SubtitleFormat,
    ) -> Result<Vec<SubtitleCue>, SubtitleError> {
        let lines: Vec<&str> = content.lines().collect();
        let mut pos = 0;

        // Skip the VTT header section (WEBVTT line plus header metadata up to
        // the first blank line).
        if format == SubtitleFormat::Vtt {
            while pos < lines.len() && lines[pos].trim().is_empty() {
                pos += 1;
            }
            if pos < lines.len()
                && lines[pos]
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .starts_with("WEBVTT")
            {
                while pos < lines.len() && !lines[pos].trim().is_empty() {
                    pos += 1;
                }
            }
        }

        let mut cues: Vec<SubtitleCue> = Vec::new();
        let mut block_num = 0;

        while pos < lines.len() {
            while pos < lines.len() && lines[pos].trim().is_empty() {
                pos += 1;
            }
            if pos >= lines.len() {
                break;
            }

            block_num += 1;
            let block_first_line = pos + 1;
            let mut block: Vec<&str> = Vec::new();
            while pos < lines.len() && !lines[pos].trim().is_empty() {
                block.push(lines[pos]);
                pos += 1;
            }

            let cue = Self::parse_block(&block, block_num, block_first_line, cues.len() + 1)?;
            cues.push(cue);
        }

        if cues.is_empty() {
            warn!("No subtitle cues found in content");
            return Err(SubtitleError::Empty);
        }

        Ok(cues)
    }

    /// Parse one blank-line-delimited block into a cue
    fn parse_block(
        block: &[&str],
        block_num: usize,
        first_line: usize,
        ordinal: usize,
    ) -> Result<SubtitleCue, SubtitleError> {
        // The timestamp line must be the first or second line of the block;
        // a leading line is an SRT index or a VTT cue identifier.
        let mut timestamp_at = None;
        for (i, raw) in block.iter().take(2).enumerate() {
            if TIMESTAMP_LINE_REGEX.is_match(raw.trim()) {
                timestamp_at = Some(i);
                break;
            }
        }

        let timestamp_at = match timestamp_at {
            Some(i) => i,
            None => {
                let (offset, message) = match block.iter().take(2).position(|l| l.contains("-->")) {
                    Some(i) => (i, "malformed timestamp line (expected HH:MM:SS,mmm --> HH:MM:SS,mmm)"),
                    None => (0, "missing timestamp line"),
                };
                return Err(SubtitleError::ParseError {
                    block: block_num,
                    line: first_line + offset,
                    message: message.to_string(),
                });
            }
        };

        let caps = match TIMESTAMP_LINE_REGEX.captures(block[timestamp_at].trim()) {
            Some(caps) => caps,
            None => {
                return Err(SubtitleError::ParseError {
                    block: block_num,
                    line: first_line + timestamp_at,
                    message: "malformed timestamp line".to_string(),
                });
            }
        };

        let start_ms = Self::captured_timestamp_ms(&caps, 1);
        let end_ms = Self::captured_timestamp_ms(&caps, 5);

        let (start_ms, end_ms) = match (start_ms, end_ms) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(SubtitleError::ParseError {
                    block: block_num,
                    line: first_line + timestamp_at,
                    message: "timestamp has out-of-range time components".to_string(),
                });
            }
        };

        let (index, identifier) = if timestamp_at == 1 {
            let head = block[0].trim();
            match head.parse::<usize>() {
                Ok(n) => (n, None),
                Err(_) => (ordinal, Some(head.to_string())),
            }
        } else {
            (ordinal, None)
        };

        // Text lines keep their whitespace so a parse/serialize round trip
        // reproduces the source; only a stray carriage return is dropped.
        let text_lines: Vec<String> = block[timestamp_at + 1..]
            .iter()
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect();

        Ok(SubtitleCue {
            index,
            identifier,
            start_ms,
            end_ms,
            lines: text_lines,
        })
    }

    /// Extract a timestamp from regex captures, validating time components
    fn captured_timestamp_ms(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
        let field = |i: usize| -> u64 {
            caps.get(start_idx + i)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };
        let (hours, minutes, seconds, millis) = (field(0), field(1), field(2), field(3));

        if minutes >= 60 || seconds >= 60 {
            return None;
        }

        Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Serialize cues to output text.
    ///
    /// SRT blocks are renumbered 1..N unless `preserve_numbering` is set; VTT
    /// output always opens with a `WEBVTT` line and keeps cue identifiers verbatim.
    pub fn serialize(
        cues: &[SubtitleCue],
        format: SubtitleFormat,
        preserve_numbering: bool,
    ) -> String {
        let mut out = String::new();

        if format == SubtitleFormat::Vtt {
            out.push_str("WEBVTT\n\n");
        }

        for (i, cue) in cues.iter().enumerate() {
            match format {
                SubtitleFormat::Srt => {
                    let number = if preserve_numbering { cue.index } else { i + 1 };
                    out.push_str(&number.to_string());
                    out.push('\n');
                }
                SubtitleFormat::Vtt => {
                    if let Some(identifier) = &cue.identifier {
                        out.push_str(identifier);
                        out.push('\n');
                    }
                }
            }

            out.push_str(&SubtitleCue::format_timestamp(cue.start_ms, format));
            out.push_str(" --> ");
            out.push_str(&SubtitleCue::format_timestamp(cue.end_ms, format));
            out.push('\n');

            for line in &cue.lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        out
    }
}

impl fmt::Display for CueCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Format: {}", self.format)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
