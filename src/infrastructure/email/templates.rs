use chrono::{DateTime, Utc};

use crate::{entities::submission::ContactFields, utils::sanitize::escape_html};

/// Email body generation for the confirmation and admin-notification mails.
/// All user-supplied text is escaped before it is embedded in markup.

pub fn confirmation_subject(company_name: &str) -> String {
    format!("Thank you for contacting {company_name}")
}

pub fn notification_subject(subject: Option<&str>) -> String {
    format!(
        "New Contact Form Submission: {}",
        subject.unwrap_or("No Subject")
    )
}

pub fn confirmation_html(
    company_name: &str,
    fields: &ContactFields,
    submission_id: &str,
) -> String {
    let company = escape_html(company_name);
    let name = escape_html(&fields.name);
    let subject_block = fields
        .subject
        .as_deref()
        .map(|s| format!("<p><strong>Subject:</strong> {}</p>\n                ", escape_html(s)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Thank You - {company}</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #4CAF50; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 20px; background-color: #f9f9f9; }}
        .footer {{ padding: 20px; text-align: center; color: #666; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{company}</h1>
            <h2>Thank You for Contacting Us!</h2>
        </div>
        <div class="content">
            <p>Dear {name},</p>
            <p>Thank you for reaching out to us. We have received your message and will get back
               to you as soon as possible.</p>
            {subject_block}<p><strong>Reference ID:</strong> {id}</p>
            <p>We typically respond within 24-48 hours during business days.</p>
            <p>If your inquiry is urgent, please call us directly.</p>
            <p>Best regards,<br>{company} Team</p>
        </div>
        <div class="footer">
            <p>This is an automated confirmation email. Please do not reply to this email.</p>
        </div>
    </div>
</body>
</html>"#,
        company = company,
        name = name,
        subject_block = subject_block,
        id = escape_html(submission_id),
    )
}

pub fn confirmation_text(
    company_name: &str,
    fields: &ContactFields,
    submission_id: &str,
) -> String {
    let subject_line = fields
        .subject
        .as_deref()
        .map(|s| format!("Subject: {s}\n"))
        .unwrap_or_default();

    format!(
        "Dear {name},\n\n\
         Thank you for reaching out to {company}. We have received your message and will get \
         back to you as soon as possible.\n\n\
         {subject_line}Reference ID: {id}\n\n\
         We typically respond within 24-48 hours during business days.\n\
         If your inquiry is urgent, please call us directly.\n\n\
         Best regards,\n\
         {company} Team\n\n\
         This is an automated confirmation email. Please do not reply to this email.",
        name = fields.name,
        company = company_name,
        subject_line = subject_line,
        id = submission_id,
    )
}

pub fn notification_html(
    fields: &ContactFields,
    submission_id: &str,
    received: DateTime<Utc>,
) -> String {
    let subject_block = fields
        .subject
        .as_deref()
        .map(|s| {
            format!(
                "<div class=\"field\"><strong>Subject:</strong> {}</div>\n            ",
                escape_html(s)
            )
        })
        .unwrap_or_default();
    let message = escape_html(&fields.message).replace('\n', "<br>");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>New Contact Form Submission</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #2196F3; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 20px; background-color: #f9f9f9; }}
        .field {{ margin-bottom: 15px; padding: 10px; background-color: white; border-left: 4px solid #2196F3; }}
        .field strong {{ color: #2196F3; }}
        .message-content {{ background-color: #fff; padding: 15px; border: 1px solid #ddd; margin-top: 10px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>New Contact Form Submission</h1>
        </div>
        <div class="content">
            <div class="field">
                <strong>Reference ID:</strong> {id}
            </div>
            <div class="field">
                <strong>Name:</strong> {name}
            </div>
            <div class="field">
                <strong>Email:</strong> {email}
            </div>
            {subject_block}<div class="field">
                <strong>Message:</strong>
                <div class="message-content">{message}</div>
            </div>
            <div class="field">
                <strong>Received:</strong> {received}
            </div>
        </div>
    </div>
</body>
</html>"#,
        id = escape_html(submission_id),
        name = escape_html(&fields.name),
        email = escape_html(&fields.email),
        subject_block = subject_block,
        message = message,
        received = received.to_rfc3339(),
    )
}

pub fn notification_text(
    fields: &ContactFields,
    submission_id: &str,
    received: DateTime<Utc>,
) -> String {
    let subject_line = fields
        .subject
        .as_deref()
        .map(|s| format!("Subject: {s}\n"))
        .unwrap_or_default();

    format!(
        "New Contact Form Submission\n\n\
         Reference ID: {id}\n\
         Name: {name}\n\
         Email: {email}\n\
         {subject_line}\n\
         Message:\n{message}\n\n\
         Received: {received}",
        id = submission_id,
        name = fields.name,
        email = fields.email,
        subject_line = subject_line,
        message = fields.message,
        received = received.to_rfc3339(),
    )
}
