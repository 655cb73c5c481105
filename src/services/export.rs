//! Spreadsheet and printable document rendering for reports.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::database::models::{AttendanceDetail, AttendanceRecap, EmployeeDetail, SalaryDetail};
use crate::database::types::{Numeric, Period};
use crate::error::AppError;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 40;
const TITLE_SIZE: i64 = 12;
const BODY_SIZE: i64 = 9;
const LINE_HEIGHT: i64 = 12;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LINE_HEIGHT) as usize - 2;

fn export_error(e: impl std::fmt::Display) -> AppError {
    log::error!("Failed to render export: {}", e);
    AppError::internal_server_error_message("Failed to render export")
}

impl From<XlsxError> for AppError {
    fn from(error: XlsxError) -> Self {
        export_error(error)
    }
}

pub fn salary_report_filename(period: Period) -> String {
    format!("salary_report_{}_{}.xlsx", period.month(), period.year())
}

pub fn attendance_report_filename(start: NaiveDate, end: NaiveDate) -> String {
    format!("attendance_{}_{}.xlsx", start.format("%Y%m%d"), end.format("%Y%m%d"))
}

pub fn salary_history_filename(employee: &EmployeeDetail) -> String {
    format!("salary_history_{}.pdf", employee.employee.nik)
}

pub fn attendance_pdf_filename(employee: &EmployeeDetail, period: Period) -> String {
    format!(
        "attendance_{}_{}_{}.pdf",
        employee.employee.nik,
        period.month(),
        period.year()
    )
}

const SALARY_COLUMNS: [(&str, f64); 12] = [
    ("No", 5.0),
    ("NIK", 18.0),
    ("Name", 28.0),
    ("Position", 22.0),
    ("Base Pay", 16.0),
    ("Position Allowance", 18.0),
    ("Transport Allowance", 18.0),
    ("Meal Allowance", 16.0),
    ("Overtime", 14.0),
    ("Deductions", 14.0),
    ("Total", 18.0),
    ("Status", 10.0),
];

/// Workbook with one sheet listing every salary of the period plus a totals row.
pub fn salary_report_xlsx(period: Period, rows: &[SalaryDetail]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let title = Format::new().set_bold().set_font_size(14).set_align(FormatAlign::Center);
    let header = Format::new().set_bold().set_align(FormatAlign::Center);
    let money = Format::new().set_num_format("#,##0.00");
    let money_bold = Format::new().set_bold().set_num_format("#,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Salaries")?;
    worksheet.merge_range(
        0,
        0,
        0,
        (SALARY_COLUMNS.len() - 1) as u16,
        &format!("Salary Report - {}", period.label()),
        &title,
    )?;
    write_header(worksheet, 2, &SALARY_COLUMNS, &header)?;

    let mut row_num: u32 = 3;
    for (index, row) in rows.iter().enumerate() {
        let s = &row.salary;
        worksheet.write_number(row_num, 0, (index + 1) as f64)?;
        worksheet.write_string(row_num, 1, &row.nik)?;
        worksheet.write_string(row_num, 2, &row.employee_name)?;
        worksheet.write_string(row_num, 3, &row.position_name)?;
        let amounts = [
            &s.base_pay,
            &s.position_allowance,
            &s.transport_allowance,
            &s.meal_allowance,
            &s.overtime_amount,
            &s.deductions,
            &s.total,
        ];
        for (offset, amount) in amounts.iter().enumerate() {
            worksheet.write_number_with_format(row_num, 4 + offset as u16, amount.to_f64(), &money)?;
        }
        worksheet.write_string(row_num, 11, s.status.as_str())?;
        row_num += 1;
    }

    let totals = [
        rows.iter().map(|r| &r.salary.base_pay).sum::<Numeric>(),
        rows.iter().map(|r| &r.salary.position_allowance).sum(),
        rows.iter().map(|r| &r.salary.transport_allowance).sum(),
        rows.iter().map(|r| &r.salary.meal_allowance).sum(),
        rows.iter().map(|r| &r.salary.overtime_amount).sum(),
        rows.iter().map(|r| &r.salary.deductions).sum(),
        rows.iter().map(|r| &r.salary.total).sum(),
    ];
    worksheet.merge_range(row_num, 0, row_num, 3, "TOTAL", &header)?;
    for (offset, amount) in totals.iter().enumerate() {
        worksheet.write_number_with_format(
            row_num,
            4 + offset as u16,
            amount.to_f64(),
            &money_bold,
        )?;
    }

    Ok(workbook.save_to_buffer()?)
}

const ATTENDANCE_COLUMNS: [(&str, f64); 9] = [
    ("No", 5.0),
    ("Date", 12.0),
    ("NIK", 18.0),
    ("Name", 28.0),
    ("Position", 22.0),
    ("Time In", 10.0),
    ("Time Out", 10.0),
    ("Status", 10.0),
    ("Note", 30.0),
];

pub fn attendance_report_xlsx(
    start: NaiveDate,
    end: NaiveDate,
    rows: &[AttendanceDetail],
) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let title = Format::new().set_bold().set_font_size(14).set_align(FormatAlign::Center);
    let header = Format::new().set_bold().set_align(FormatAlign::Center);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Attendance")?;
    worksheet.merge_range(
        0,
        0,
        0,
        (ATTENDANCE_COLUMNS.len() - 1) as u16,
        &format!("Attendance Report {} to {}", start, end),
        &title,
    )?;
    write_header(worksheet, 2, &ATTENDANCE_COLUMNS, &header)?;

    let mut row_num: u32 = 3;
    for (index, row) in rows.iter().enumerate() {
        let a = &row.attendance;
        worksheet.write_number(row_num, 0, (index + 1) as f64)?;
        worksheet.write_string(row_num, 1, a.date.to_string())?;
        worksheet.write_string(row_num, 2, &row.nik)?;
        worksheet.write_string(row_num, 3, &row.employee_name)?;
        worksheet.write_string(row_num, 4, &row.position_name)?;
        worksheet.write_string(row_num, 5, &a.time_in)?;
        worksheet.write_string(row_num, 6, &a.time_out)?;
        worksheet.write_string(row_num, 7, a.status.as_str())?;
        worksheet.write_string(row_num, 8, &a.note)?;
        row_num += 1;
    }

    worksheet.write_string_with_format(row_num + 1, 0, format!("Total records: {}", rows.len()), &header)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_header(
    worksheet: &mut Worksheet,
    row: u32,
    columns: &[(&str, f64)],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, (name, width)) in columns.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, *name, format)?;
        worksheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

/// Salary history of one employee as a paginated document.
pub fn salary_history_pdf(
    employee: &EmployeeDetail,
    rows: &[SalaryDetail],
) -> Result<Vec<u8>, AppError> {
    let header = format!(
        "{:<15}{:>15}{:>15}{:>13}{:>13}{:>15}  {:<8}",
        "Period", "Base Pay", "Allowances", "Overtime", "Deductions", "Total", "Status"
    );

    let body = rows
        .iter()
        .map(|row| {
            let s = &row.salary;
            let period = s.period();
            let allowances = s.position_allowance.clone()
                + s.transport_allowance.clone()
                + s.meal_allowance.clone();
            format!(
                "{:<15}{:>15}{:>15}{:>13}{:>13}{:>15}  {:<8}",
                period.label(),
                s.base_pay.grouped(),
                allowances.grouped(),
                s.overtime_amount.grouped(),
                s.deductions.grouped(),
                s.total.grouped(),
                s.status.as_str()
            )
        })
        .collect();

    let total: Numeric = rows.iter().map(|r| &r.salary.total).sum();
    let footer = vec![
        format!("Salary records: {}", rows.len()),
        format!("Total paid and pending: {}", total.grouped()),
    ];

    TextDocument {
        title: "SALARY HISTORY".to_string(),
        subtitle: employee_lines(employee),
        header,
        body,
        footer,
    }
    .render()
}

/// Monthly attendance of one employee with its status recap.
pub fn attendance_pdf(
    employee: &EmployeeDetail,
    period: Period,
    rows: &[AttendanceDetail],
    recap: &AttendanceRecap,
) -> Result<Vec<u8>, AppError> {
    let header = format!(
        "{:<12}{:<10}{:<10}{:<10}{}",
        "Date", "Time In", "Time Out", "Status", "Note"
    );

    let body = rows
        .iter()
        .map(|row| {
            let a = &row.attendance;
            format!(
                "{:<12}{:<10}{:<10}{:<10}{}",
                a.date.to_string(),
                a.time_in,
                a.time_out,
                a.status.as_str(),
                a.note
            )
        })
        .collect();

    let mut subtitle = employee_lines(employee);
    subtitle.push(format!("Period: {}", period.label()));

    TextDocument {
        title: "ATTENDANCE REPORT".to_string(),
        subtitle,
        header,
        body,
        footer: vec![format!(
            "Present: {}   Leave: {}   Sick: {}   Absent: {}   Total: {}",
            recap.present,
            recap.leave,
            recap.sick,
            recap.absent,
            recap.total()
        )],
    }
    .render()
}

fn employee_lines(employee: &EmployeeDetail) -> Vec<String> {
    vec![
        format!("Employee: {}", employee.employee.name),
        format!("NIK: {}", employee.employee.nik),
        format!(
            "Position: {}",
            employee.position_name.as_deref().unwrap_or("-")
        ),
    ]
}

/// Monospaced A4 document: a title block, a repeated column header, body
/// lines split across pages and a closing totals block.
struct TextDocument {
    title: String,
    subtitle: Vec<String>,
    header: String,
    body: Vec<String>,
    footer: Vec<String>,
}

enum Line {
    Title(String),
    Text(String),
    Bold(String),
    Blank,
}

impl TextDocument {
    fn pages(&self) -> Vec<Vec<Line>> {
        let rule = "-".repeat(self.header.len().max(40));
        let mut pages = Vec::new();
        let mut page = vec![Line::Title(self.title.clone())];
        page.extend(self.subtitle.iter().cloned().map(Line::Text));
        page.push(Line::Blank);

        let body_start = |page: &mut Vec<Line>| {
            page.push(Line::Bold(self.header.clone()));
            page.push(Line::Text(rule.clone()));
        };
        body_start(&mut page);

        for line in &self.body {
            if page.len() >= LINES_PER_PAGE {
                pages.push(std::mem::take(&mut page));
                body_start(&mut page);
            }
            page.push(Line::Text(line.clone()));
        }

        if page.len() + self.footer.len() + 2 > LINES_PER_PAGE {
            pages.push(std::mem::take(&mut page));
        }
        page.push(Line::Text(rule.clone()));
        page.extend(self.footer.iter().cloned().map(Line::Bold));
        pages.push(page);

        pages
    }

    fn render(&self) -> Result<Vec<u8>, AppError> {
        let pages = self.pages();
        let page_count = pages.len();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for (index, lines) in pages.iter().enumerate() {
            let mut operations = Vec::new();
            let mut y = PAGE_HEIGHT - MARGIN;
            for line in lines {
                match line {
                    Line::Title(text) => {
                        push_text(&mut operations, "F2", TITLE_SIZE, y, text);
                        y -= LINE_HEIGHT + 4;
                        continue;
                    }
                    Line::Text(text) => push_text(&mut operations, "F1", BODY_SIZE, y, text),
                    Line::Bold(text) => push_text(&mut operations, "F2", BODY_SIZE, y, text),
                    Line::Blank => {}
                }
                y -= LINE_HEIGHT;
            }
            push_text(
                &mut operations,
                "F1",
                BODY_SIZE - 1,
                MARGIN / 2,
                &format!("Page {} of {}", index + 1, page_count),
            );

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().map_err(export_error)?,
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let media_box: Vec<Object> =
            vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).map_err(export_error)?;
        Ok(buffer)
    }
}

fn push_text(operations: &mut Vec<Operation>, font: &str, size: i64, y: i64, text: &str) {
    // Standard Type1 fonts take single-byte text only.
    let printable: String = text
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect();

    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
    operations.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
    operations.push(Operation::new("Tj", vec![Object::string_literal(printable)]));
    operations.push(Operation::new("ET", vec![]));
}
