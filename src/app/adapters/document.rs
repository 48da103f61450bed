//! Channel document reading
//!
//! Decodes the raw survey bytes and deserializes them into a [`ChannelRecord`].
//! Only the shape needed by the mapping pipeline is checked: the root element
//! must be `Channel`, and unknown elements are ignored.

use crate::app::models::channel::ChannelRecord;
use crate::constants::CHANNEL_ROOT_ELEMENT;
use crate::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse a channel document from raw bytes
pub fn parse_channel(bytes: &[u8]) -> Result<ChannelRecord> {
    let text = decode(bytes)?;

    check_root_element(text)?;

    let channel: ChannelRecord = quick_xml::de::from_str(text)?;

    debug!(
        "Parsed channel document: version {:?}, {} transects",
        channel.software_version,
        channel.transects.len()
    );

    Ok(channel)
}

fn decode(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::document(format!("Document is not valid UTF-8: {}", e), None))?;

    Ok(text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text))
}

fn check_root_element(text: &str) -> Result<()> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                let name = element.local_name();
                return if name.as_ref() == CHANNEL_ROOT_ELEMENT.as_bytes() {
                    Ok(())
                } else {
                    Err(Error::document(
                        format!(
                            "Expected root element <{}> but found <{}>",
                            CHANNEL_ROOT_ELEMENT,
                            String::from_utf8_lossy(name.as_ref())
                        ),
                        None,
                    ))
                };
            }
            Ok(Event::Eof) => {
                return Err(Error::document("Document has no root element", None));
            }
            Ok(_) => continue,
            Err(e) => {
                return Err(Error::document(
                    format!(
                        "Malformed document at position {}: {}",
                        reader.error_position(),
                        e
                    ),
                    None,
                ));
            }
        }
    }
}
