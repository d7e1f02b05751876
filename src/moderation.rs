//! [`Text`], [`Image`], and [`File`] requests for the SafeComms moderation
//! endpoints.
//!
//! Requests are created with a required argument and grown with consuming
//! builder methods. Optional fields left unset are omitted from the wire
//! format entirely, so an absent flag is distinguishable from an explicit
//! `false`.

use std::{borrow::Cow, path::Path};

use base64::engine::{general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Language assumed for requests that don't set one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Substitute [`DEFAULT_LANGUAGE`] for an unset or empty language.
pub(crate) fn language_or_default(
    language: Option<Cow<'_, str>>,
) -> Cow<'_, str> {
    language
        .filter(|language| !language.is_empty())
        .unwrap_or(Cow::Borrowed(DEFAULT_LANGUAGE))
}

/// Request body for [`Client::moderate_text`].
///
/// [`Client::moderate_text`]: crate::Client::moderate_text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct Text<'a> {
    /// Text to moderate.
    pub content: Cow<'a, str>,
    /// Language of the content. [`DEFAULT_LANGUAGE`] is substituted when this
    /// is unset or empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Cow<'a, str>>,
    /// Ask the service to return the content with flagged spans replaced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
    /// Ask the service to detect personally identifiable information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii: Option<bool>,
    /// Minimum severity at which flagged spans are replaced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_severity: Option<Cow<'a, str>>,
    /// Identifier of a server-side moderation profile to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_profile_id: Option<Cow<'a, str>>,
}

impl<'a> Text<'a> {
    /// Create a request to moderate `content`.
    pub fn new<C>(content: C) -> Self
    where
        C: Into<Cow<'a, str>>,
    {
        Self {
            content: content.into(),
            language: None,
            replace: None,
            pii: None,
            replace_severity: None,
            moderation_profile_id: None,
        }
    }

    /// Set the content [`language`].
    ///
    /// [`language`]: Self::language
    pub fn language<L>(mut self, language: L) -> Self
    where
        L: Into<Cow<'a, str>>,
    {
        self.language = Some(language.into());
        self
    }

    /// Ask for flagged spans to be replaced in the returned content.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = Some(replace);
        self
    }

    /// Ask for personally identifiable information detection.
    pub fn pii(mut self, pii: bool) -> Self {
        self.pii = Some(pii);
        self
    }

    /// Set the minimum severity at which spans are replaced.
    pub fn replace_severity<S>(mut self, severity: S) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        self.replace_severity = Some(severity.into());
        self
    }

    /// Apply a server-side moderation profile.
    pub fn moderation_profile_id<I>(mut self, id: I) -> Self
    where
        I: Into<Cow<'a, str>>,
    {
        self.moderation_profile_id = Some(id.into());
        self
    }
}

/// Request body for [`Client::moderate_image`]. The payload is the encoded
/// image representation the service expects, built with [`from_encoded`],
/// [`from_compressed`], or [`encode`].
///
/// [`Client::moderate_image`]: crate::Client::moderate_image
/// [`from_encoded`]: Self::from_encoded
/// [`from_compressed`]: Self::from_compressed
/// [`encode`]: Self::encode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct Image<'a> {
    /// Encoded image payload.
    pub image: Cow<'a, str>,
    /// Language for any text found in the image. [`DEFAULT_LANGUAGE`] is
    /// substituted when this is unset or empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Cow<'a, str>>,
    /// Identifier of a server-side moderation profile to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_profile_id: Option<Cow<'a, str>>,
}

impl<'a> Image<'a> {
    /// Use `image` as the payload as-is. The caller is responsible for the
    /// encoding or the API will reject it.
    pub fn from_encoded<I>(image: I) -> Self
    where
        I: Into<Cow<'a, str>>,
    {
        Self {
            image: image.into(),
            language: None,
            moderation_profile_id: None,
        }
    }

    /// Encode from compressed image data (not base64 encoded). This cannot
    /// fail but if the data is not a valid image, the API will reject it.
    pub fn from_compressed<D>(data: D) -> Self
    where
        D: AsRef<[u8]>,
    {
        let encoder = general_purpose::STANDARD;

        Self::from_encoded(encoder.encode(data.as_ref()))
    }

    /// Compress and encode a payload from any type that can be converted
    /// into an [`image::RgbaImage`].
    #[cfg(feature = "image")]
    pub fn encode<I>(
        format: image::ImageFormat,
        image: I,
    ) -> Result<Self, image::ImageError>
    where
        I: Into<image::RgbaImage>,
    {
        let mut cursor = std::io::Cursor::new(Vec::new());
        let rgba: image::RgbaImage = image.into();
        rgba.write_to(&mut cursor, format)?;
        Ok(Self::from_compressed(cursor.into_inner()))
    }

    /// Decode the payload back into an [`image::RgbaImage`].
    #[cfg(feature = "image")]
    pub fn decode(&self) -> Result<image::RgbaImage, ImageDecodeError> {
        let data = general_purpose::STANDARD.decode(self.image.as_ref())?;
        Ok(image::load_from_memory(&data)?.to_rgba8())
    }

    /// Set the content [`language`].
    ///
    /// [`language`]: Self::language
    pub fn language<L>(mut self, language: L) -> Self
    where
        L: Into<Cow<'a, str>>,
    {
        self.language = Some(language.into());
        self
    }

    /// Apply a server-side moderation profile.
    pub fn moderation_profile_id<I>(mut self, id: I) -> Self
    where
        I: Into<Cow<'a, str>>,
    {
        self.moderation_profile_id = Some(id.into());
        self
    }
}

/// Errors that can occur when decoding an [`Image`] payload.
#[cfg(feature = "image")]
#[derive(Debug, thiserror::Error)]
pub enum ImageDecodeError {
    /// Invalid base64 encoding.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Invalid image data.
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(feature = "image")]
impl TryInto<image::RgbaImage> for Image<'_> {
    type Error = ImageDecodeError;

    /// An [`Image`] payload can be decoded into an [`image::RgbaImage`] if it
    /// is valid base64 encoded compressed image data and the image format is
    /// supported.
    fn try_into(self) -> Result<image::RgbaImage, Self::Error> {
        self.decode()
    }
}

/// Request for [`Client::moderate_image_file`]: moderate an image uploaded
/// from a local file. The file is read when the call is made, not when the
/// request is created.
///
/// [`Client::moderate_image_file`]: crate::Client::moderate_image_file
#[derive(Debug, Clone)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
pub struct File<'a> {
    /// Path of the file to upload. Must refer to a readable file.
    pub path: Cow<'a, Path>,
    /// Language for any text found in the image. [`DEFAULT_LANGUAGE`] is
    /// substituted when this is unset or empty.
    pub language: Option<Cow<'a, str>>,
    /// Identifier of a server-side moderation profile to apply.
    pub moderation_profile_id: Option<Cow<'a, str>>,
}

impl<'a> File<'a> {
    /// Create an upload request for the file at `path`.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<Cow<'a, Path>>,
    {
        Self {
            path: path.into(),
            language: None,
            moderation_profile_id: None,
        }
    }

    /// Set the content [`language`].
    ///
    /// [`language`]: Self::language
    pub fn language<L>(mut self, language: L) -> Self
    where
        L: Into<Cow<'a, str>>,
    {
        self.language = Some(language.into());
        self
    }

    /// Apply a server-side moderation profile.
    pub fn moderation_profile_id<I>(mut self, id: I) -> Self
    where
        I: Into<Cow<'a, str>>,
    {
        self.moderation_profile_id = Some(id.into());
        self
    }
}
