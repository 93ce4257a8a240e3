//! Content - キャンペーンのペイロード
//!
//! キャンペーンが送るペイロードはちょうど 1 つ:
//! テキストのみ、またはキャプション付き（任意）のメディア参照。
//! どちらにもボタンを 1 つだけ付けられる。

use serde::{Deserialize, Serialize};

use super::errors::ContentError;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "gif"];
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Photo,
}

impl MediaKind {
    /// メディア参照（パスまたは URL）を拡張子で分類する
    ///
    /// 大文字小文字は区別せず、`?query` / `#fragment` は無視する。
    pub fn classify(reference: &str) -> Option<Self> {
        let path = reference
            .split(['?', '#'])
            .next()
            .unwrap_or(reference);
        let file = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();

        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Photo)
        } else {
            None
        }
    }
}

/// メッセージの下に付くラベル付きボタン（1 つだけ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Body {
    Text {
        text: String,
    },
    Media {
        kind: MediaKind,
        reference: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub body: Body,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<ActionButton>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            body: Body::Text { text: text.into() },
            button: None,
        }
    }

    pub fn media(reference: impl Into<String>, caption: Option<String>) -> Result<Self, ContentError> {
        let reference = reference.into();
        let kind = MediaKind::classify(&reference)
            .ok_or_else(|| ContentError::UnsupportedMedia(reference.clone()))?;
        Ok(Self {
            body: Body::Media {
                kind,
                reference,
                caption,
            },
            button: None,
        })
    }

    pub fn with_button(mut self, button: ActionButton) -> Self {
        self.button = Some(button);
        self
    }

    /// recipient に見えるテキスト（本文またはキャプション）
    pub fn visible_text(&self) -> Option<&str> {
        match &self.body {
            Body::Text { text } => Some(text.as_str()),
            Body::Media { caption, .. } => caption.as_deref(),
        }
    }
}

/// キャンペーン開始時にトリガーが渡すもの
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub media_ref: Option<String>,
    #[serde(default)]
    pub button_label: Option<String>,
    #[serde(default)]
    pub button_url: Option<String>,
}

impl CampaignRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl TryFrom<CampaignRequest> for Content {
    type Error = ContentError;

    fn try_from(req: CampaignRequest) -> Result<Self, Self::Error> {
        let text = req.text.trim();
        let content = match req.media_ref {
            Some(reference) => {
                let caption = (!text.is_empty()).then(|| text.to_string());
                Content::media(reference, caption)?
            }
            None if text.is_empty() => return Err(ContentError::Empty),
            None => Content::text(text),
        };

        match req.button_label {
            Some(label) if label.trim().is_empty() => Err(ContentError::EmptyButtonLabel),
            Some(label) => Ok(content.with_button(ActionButton {
                label: label.trim().to_string(),
                url: req.button_url,
            })),
            None => Ok(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("clip.mp4", Some(MediaKind::Video))]
    #[case("https://cdn.example.com/a/Intro.MOV?sig=abc", Some(MediaKind::Video))]
    #[case("loop.gif", Some(MediaKind::Video))]
    #[case("banner.jpeg", Some(MediaKind::Photo))]
    #[case("/tmp/photo.PNG#frag", Some(MediaKind::Photo))]
    #[case("notes.pdf", None)]
    #[case("no_extension", None)]
    #[case("https://example.com/dir.mp4/file", None)]
    fn classifies_media_by_extension(#[case] reference: &str, #[case] expected: Option<MediaKind>) {
        assert_eq!(MediaKind::classify(reference), expected);
    }

    #[test]
    fn text_request_becomes_text_content() {
        let content = Content::try_from(CampaignRequest::text("  hello  ")).unwrap();
        assert_eq!(content, Content::text("hello"));
        assert_eq!(content.visible_text(), Some("hello"));
    }

    #[test]
    fn media_request_uses_text_as_caption() {
        let req = CampaignRequest {
            text: "new episode".into(),
            media_ref: Some("ep1.mp4".into()),
            button_label: Some("Watch".into()),
            button_url: Some("https://example.com/ep1".into()),
        };
        let content = Content::try_from(req).unwrap();
        assert_eq!(
            content.body,
            Body::Media {
                kind: MediaKind::Video,
                reference: "ep1.mp4".into(),
                caption: Some("new episode".into()),
            }
        );
        assert_eq!(content.button.unwrap().label, "Watch");
    }

    #[test]
    fn media_without_text_has_no_caption() {
        let req = CampaignRequest {
            media_ref: Some("cover.jpg".into()),
            ..CampaignRequest::default()
        };
        let content = Content::try_from(req).unwrap();
        assert_eq!(content.visible_text(), None);
    }

    #[test]
    fn rejects_empty_and_unsupported_content() {
        assert_eq!(
            Content::try_from(CampaignRequest::text("   ")),
            Err(ContentError::Empty)
        );

        let req = CampaignRequest {
            media_ref: Some("report.pdf".into()),
            ..CampaignRequest::default()
        };
        assert_eq!(
            Content::try_from(req),
            Err(ContentError::UnsupportedMedia("report.pdf".into()))
        );

        let req = CampaignRequest {
            button_label: Some(" ".into()),
            ..CampaignRequest::text("hi")
        };
        assert_eq!(Content::try_from(req), Err(ContentError::EmptyButtonLabel));
    }
}
