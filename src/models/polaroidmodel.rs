use std::fmt;
use std::str::FromStr;

/// Which of the two request images a stage is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    First,
    Second,
}

impl ImageSlot {
    pub fn number(&self) -> u8 {
        match self {
            ImageSlot::First => 1,
            ImageSlot::Second => 2,
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "image {}", self.number())
    }
}

/// Image hosting backend used to turn uploaded bytes into a public URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageHostKind {
    TmpFiles,
    PostImages,
}

impl ImageHostKind {
    pub fn to_str(&self) -> &str {
        match self {
            ImageHostKind::TmpFiles => "tmpfiles",
            ImageHostKind::PostImages => "postimages",
        }
    }
}

impl FromStr for ImageHostKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tmpfiles" | "tmpfiles.org" => Ok(ImageHostKind::TmpFiles),
            "postimages" | "postimages.org" | "postimg" | "postimg.cc" => Ok(ImageHostKind::PostImages),
            other => Err(format!("unknown image host '{}'", other)),
        }
    }
}

/// MIME type declared on the returned data URL.
///
/// This is a fixed contract chosen by configuration. The compositor's bytes
/// are never sniffed to pick it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMime {
    Png,
    Jpeg,
}

impl ResultMime {
    pub fn to_str(&self) -> &str {
        match self {
            ResultMime::Png => "image/png",
            ResultMime::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for ResultMime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image/png" | "png" => Ok(ResultMime::Png),
            "image/jpeg" | "image/jpg" | "jpeg" | "jpg" => Ok(ResultMime::Jpeg),
            other => Err(format!("unsupported result mime type '{}'", other)),
        }
    }
}
