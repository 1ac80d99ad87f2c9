use chrono::NaiveDate;

/// This is the standard way of naming a day's note folder in touchgrass.
pub fn date_to_folder_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
