use html_escape::decode_html_entities;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::app::{Result, WaktuError};
use crate::domain::{Region, Zone};

/// `id` of the `<select>` element holding the zone catalog.
const ZONE_SELECT_ID: &str = "inputZone";

/// Option labels start with the zone code and a separator (`JHR01 - `).
const LOCATION_PREFIX_LEN: usize = 8;

/// Parse the zone catalog out of the authority's HTML page.
///
/// Each `<optgroup>` of the zone `<select>` becomes a [`Region`] and each of
/// its `<option>`s a [`Zone`]. Only the `<select>` fragment is handed to the
/// reader, so the rest of the page never has to be well formed.
pub fn parse_catalog(html: &str) -> Result<Vec<Region>> {
    let fragment = zone_select_fragment(html)
        .ok_or_else(|| WaktuError::CatalogParse(format!("no <select id=\"{ZONE_SELECT_ID}\">")))?;

    let mut reader = Reader::from_str(fragment);
    reader.config_mut().check_end_names = false;

    let mut regions = Vec::new();
    let mut group: Option<(String, Vec<Zone>)> = None;
    let mut option: Option<(String, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"optgroup" => {
                    finish_option(&mut option, &mut group);
                    finish_group(&mut group, &mut regions);
                    group = Some((attribute(e, "label")?.unwrap_or_default(), Vec::new()));
                }
                b"option" => {
                    finish_option(&mut option, &mut group);
                    option = attribute(e, "value")?
                        .filter(|v| !v.trim().is_empty())
                        .map(|v| (v.trim().to_string(), String::new()));
                }
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                if let Some((_, text)) = option.as_mut() {
                    let raw = std::str::from_utf8(t).map_err(catalog_error)?;
                    text.push_str(&decode_html_entities(raw));
                }
            }
            Ok(Event::GeneralRef(ref r)) => {
                if let Some((_, text)) = option.as_mut() {
                    let name = std::str::from_utf8(r).map_err(catalog_error)?;
                    text.push_str(&decode_html_entities(&format!("&{name};")));
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"option" => finish_option(&mut option, &mut group),
                b"optgroup" => {
                    finish_option(&mut option, &mut group);
                    finish_group(&mut group, &mut regions);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(catalog_error(e)),
            _ => {}
        }
    }

    finish_option(&mut option, &mut group);
    finish_group(&mut group, &mut regions);

    Ok(regions)
}

/// Clean an option label into a location list.
///
/// `"JHR01 - Pulau Aur dan Pulau Pemanggil"` → `"Pulau Aur, Pulau Pemanggil"`.
pub fn clean_location(raw: &str) -> String {
    let stripped = raw
        .char_indices()
        .nth(LOCATION_PREFIX_LEN)
        .map(|(i, _)| raw[i..].trim())
        .unwrap_or("");
    let location = if stripped.is_empty() { raw.trim() } else { stripped };
    location.replace(" dan ", ", ")
}

fn zone_select_fragment(html: &str) -> Option<&str> {
    let marker = html
        .find(&format!("id=\"{ZONE_SELECT_ID}\""))
        .or_else(|| html.find(&format!("id='{ZONE_SELECT_ID}'")))?;
    let start = html[..marker].rfind("<select")?;
    let end = marker + html[marker..].find("</select>")? + "</select>".len();
    Some(&html[start..end])
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in e.html_attributes() {
        let attr = attr.map_err(catalog_error)?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = std::str::from_utf8(&attr.value).map_err(catalog_error)?;
            return Ok(Some(decode_html_entities(value).into_owned()));
        }
    }
    Ok(None)
}

fn finish_option(option: &mut Option<(String, String)>, group: &mut Option<(String, Vec<Zone>)>) {
    if let Some((id, text)) = option.take() {
        match group.as_mut() {
            Some((_, zones)) => zones.push(Zone::new(id, clean_location(&text))),
            None => tracing::debug!("Ignoring zone option {} outside any group", id),
        }
    }
}

fn finish_group(group: &mut Option<(String, Vec<Zone>)>, regions: &mut Vec<Region>) {
    if let Some((name, zones)) = group.take() {
        match Region::from_zones(name.trim().to_string(), zones) {
            Some(region) => regions.push(region),
            None => tracing::warn!("Skipping region {:?} without zones", name),
        }
    }
}

fn catalog_error(e: impl ToString) -> WaktuError {
    WaktuError::CatalogParse(e.to_string())
}
