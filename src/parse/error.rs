use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    XmlParse(String),
    MissingElement(String),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Self::XmlParse(e.to_string())
    }
}

impl Error {
    pub fn missing_element_error(msg: &str) -> Self {
        Self::MissingElement(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XmlParse(msg) => write!(f, "XML Parse Error: {msg}"),
            Self::MissingElement(msg) => write!(f, "Missing Element: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
