//! Converts remote payloads into domain models.
//!
//! - [`catalog`]: zone catalog HTML → [`Region`](crate::domain::Region)s
//! - [`schedule`]: yearly schedule JSON → [`ScheduleEntry`](crate::domain::ScheduleEntry)s

pub mod catalog;
pub mod schedule;

pub use catalog::{clean_location, parse_catalog};
pub use schedule::parse_schedule;

#[cfg(test)]
pub(crate) mod fixtures {
    pub const CATALOG_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>e-Solat</title><script>if (a < b) { go(); }</script></head>
<body>
<select id="inputZone" class="form-control">
  <optgroup label="Johor">
    <option value="JHR01" selected>JHR01 - Pulau Aur dan Pulau Pemanggil</option>
    <option value="JHR02">JHR02 - Johor Bahru, Kota Tinggi, Mersing</option>
  </optgroup>
  <optgroup label="Pulau Pinang">
    <option value="PNG01">08              PULAU PINANG dan SEBERANG PERAI</option>
  </optgroup>
  <optgroup label="Wilayah Persekutuan">
    <option value="WLY01">WLY01 - Kuala Lumpur &amp; Putrajaya</option>
  </optgroup>
</select>
<br>
</body>
</html>"#;

    pub const SCHEDULE_JSON: &str = r#"{
  "prayerTime": [
    {
      "hijri": "1445-09-05",
      "date": "15-Mar-2024",
      "day": "Friday",
      "imsak": "05:58:00",
      "fajr": "06:08:00",
      "syuruk": "07:17:00",
      "dhuhr": "13:22:00",
      "asr": "16:26:00",
      "maghrib": "19:24:00",
      "isha": "20:36:00"
    },
    {
      "hijri": "1445-09-06",
      "date": "16-Mar-2024",
      "day": "Saturday",
      "imsak": "05:57:00",
      "fajr": "06:07:00",
      "syuruk": "07:16:00",
      "dhuhr": "13:22:00",
      "asr": "16:25:00",
      "maghrib": "19:24:00",
      "isha": "20:35:00"
    }
  ],
  "status": "OK!",
  "serverTime": "2024-03-15 09:00:00",
  "periodType": "year",
  "lang": "ms_my",
  "zone": "WLY01",
  "bearing": "292&#176; 31&#8242; 28&#8243;"
}"#;
}
