use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Site-wide metadata: name, footer, contact details, social links. Stored
/// as a single row, created by bootstrap and edited by operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub site_name: String,
    pub tagline: String,
    pub footer_text: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub contact_address: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub instagram_url: String,
    pub linkedin_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationLink {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub position: i64,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewNavigationLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FooterSection {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroSection {
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
}

/// Homepage content blocks, one per section type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Mission,
    Expose,
    Truth,
    Community,
}

impl SectionType {
    pub const ALL: [SectionType; 4] = [
        SectionType::Mission,
        SectionType::Expose,
        SectionType::Truth,
        SectionType::Community,
    ];
}

impl FromStr for SectionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mission" => Ok(Self::Mission),
            "expose" => Ok(Self::Expose),
            "truth" => Ok(Self::Truth),
            "community" => Ok(Self::Community),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mission => write!(f, "mission"),
            Self::Expose => write!(f, "expose"),
            Self::Truth => write!(f, "truth"),
            Self::Community => write!(f, "community"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeSection {
    pub id: i64,
    pub section_type: SectionType,
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutPage {
    pub intro: String,
    pub mission: String,
    pub body: String,
    pub process_steps: Vec<String>,
    pub closing: String,
}

fn default_true() -> bool {
    true
}
