/// One block of user-supplied model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptBlock {
    Text { text: String },
    Image { data: String },
}

/// Ordered, non-empty blocks: URL, page text, image, user notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptInput {
    blocks: Vec<PromptBlock>,
}

impl PromptInput {
    pub fn blocks(&self) -> &[PromptBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn has_image(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| matches!(b, PromptBlock::Image { .. }))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build the user blocks from whatever inputs are present. Absent or blank
/// inputs contribute nothing.
pub fn assemble(
    url: Option<&str>,
    page_text: Option<&str>,
    image_data: Option<&str>,
    notes: Option<&str>,
) -> PromptInput {
    let blocks = [
        present(url).map(|u| PromptBlock::Text {
            text: format!("page_url: {u}"),
        }),
        present(page_text).map(|t| PromptBlock::Text {
            text: format!("page_text: {t}"),
        }),
        present(image_data).map(|d| PromptBlock::Image {
            data: d.to_string(),
        }),
        present(notes).map(|n| PromptBlock::Text {
            text: format!("user_notes: {n}"),
        }),
    ]
    .into_iter()
    .flatten()
    .collect();

    PromptInput { blocks }
}

pub const SYSTEM_PROMPT: &str = r#"You are "RentalGuard", an analyst who spots rental-listing scams.

Inputs you may receive:
- page_url: the listing URL (the page may sit behind a login wall)
- page_text: plain text stripped from that page (may be missing)
- user_notes: anything the renter wants to add
- an image: a screenshot of the listing or of a conversation

Reply with a single JSON object of exactly this shape:
{
  "score": number,            // 0 = clearly legitimate, 100 = clearly a scam
  "verdict": "no-scam" | "likely-no-scam" | "uncertain" | "likely-scam" | "scam",
  "top_signals": string[],    // 3 to 8 short bullets behind the score
  "advice": string[],         // 3 to 6 safe next steps
  "notes": string,            // caveats and limits of this analysis
  "explanation": string,      // one plain sentence a renter can read at a glance
  "red_flags": [{"text": string, "severity": "low" | "medium" | "high"}],
  "recommendation": string    // the single most important thing to do next
}

Score bands:
- 0-19: nothing meaningful stands out.
- 20-39: minor concerns, listing is plausible.
- 40-59: mixed or thin evidence.
- 60-79: several strong warning signs.
- 80-100: clear scam markers or severe risk.

Evidence to weigh, without inventing facts:
- Rent well below market, pressure to decide fast, owner "abroad", no viewings.
- Payment by crypto, wire, gift card or money transfer; deposit or ID before a viewing.
- Moving the chat to WhatsApp or Telegram, free webmail contacts, names that do not match.
- Address or photos that do not line up, stock interiors, foreign watermarks, phone numbers painted over images.
- Broken or templated language reused across cities, look-alike domains, thin social proof.
- Screenshot details that contradict the page text.

When the inputs are thin, keep the score conservative, say what is missing in "notes", and prefer "uncertain".
Output the JSON object only: no markdown, no commentary."#;
