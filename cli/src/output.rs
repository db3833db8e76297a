//! Plain-text rendering of API results for the terminal.

use std::io::{self, Write};

use createsend_core::{Client, List, ListForEmail, Page, Subscriber};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn clients(out: &mut impl Write, clients: &[Client]) -> io::Result<()> {
    if clients.is_empty() {
        return writeln!(out, "No clients found.");
    }
    for client in clients {
        writeln!(out, "{:<34} {}", client.client_id, client.name)?;
    }
    Ok(())
}

pub fn lists(out: &mut impl Write, lists: &[List]) -> io::Result<()> {
    if lists.is_empty() {
        return writeln!(out, "No lists found.");
    }
    for list in lists {
        writeln!(out, "{:<34} {}", list.list_id, list.name)?;
    }
    Ok(())
}

pub fn memberships(out: &mut impl Write, lists: &[ListForEmail]) -> io::Result<()> {
    if lists.is_empty() {
        return writeln!(out, "Not subscribed to any list.");
    }
    for list in lists {
        writeln!(
            out,
            "{:<34} {:<14} {}",
            list.list_id, list.subscriber_state, list.list_name
        )?;
    }
    Ok(())
}

pub fn subscriber(out: &mut impl Write, sub: &Subscriber) -> io::Result<()> {
    writeln!(out, "Email:   {}", sub.email_address)?;
    writeln!(out, "Name:    {}", sub.name)?;
    writeln!(out, "State:   {}", sub.state)?;
    if let Some(date) = sub.date {
        writeln!(out, "Date:    {}", date.format(DATE_FORMAT))?;
    }
    for field in &sub.custom_fields {
        writeln!(out, "{}: {}", field.key, field.value)?;
    }
    Ok(())
}

pub fn subscriber_page(out: &mut impl Write, page: &Page<Subscriber>) -> io::Result<()> {
    for sub in &page.results {
        let date = sub
            .date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        writeln!(out, "{:<40} {:<19} {}", sub.email_address, date, sub.name)?;
    }
    writeln!(
        out,
        "page {}/{} ({} of {} subscribers)",
        page.page_number,
        page.number_of_pages.max(1),
        page.records_on_this_page,
        page.total_number_of_records
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_client_list_says_so() {
        assert_eq!(render(|out| clients(out, &[])), "No clients found.\n");
    }

    #[test]
    fn clients_are_aligned_rows() {
        let text = render(|out| {
            clients(
                out,
                &[Client {
                    client_id: "12ab".to_string(),
                    name: "Alice".to_string(),
                }],
            )
        });
        assert_eq!(text, format!("{:<34} Alice\n", "12ab"));
    }

    #[test]
    fn subscriber_shows_date_when_known() {
        let sub = Subscriber {
            email_address: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            date: NaiveDate::from_ymd_opt(2010, 10, 25).and_then(|d| d.and_hms_opt(10, 28, 0)),
            state: "Active".to_string(),
            ..Default::default()
        };
        let text = render(|out| subscriber(out, &sub));
        assert!(text.contains("State:   Active\n"));
        assert!(text.contains("Date:    2010-10-25 10:28:00\n"));

        let undated = Subscriber { date: None, ..sub };
        assert!(!render(|out| subscriber(out, &undated)).contains("Date:"));
    }

    #[test]
    fn empty_page_reports_page_one() {
        let page: Page<Subscriber> = Page {
            results: Vec::new(),
            results_ordered_by: "email".to_string(),
            order_direction: "asc".to_string(),
            page_number: 1,
            page_size: 1000,
            records_on_this_page: 0,
            total_number_of_records: 0,
            number_of_pages: 0,
        };
        assert_eq!(
            render(|out| subscriber_page(out, &page)),
            "page 1/1 (0 of 0 subscribers)\n"
        );
    }
}
