use pdf_flow::layout::{Cell, Margins, Table, Text};
use pdf_flow::page::LayoutManager;
use pdf_flow::pagesize::{Orientation, LETTER};
use pdf_flow::style::{Align, CellStyle, TextStyle};
use pdf_flow::{colours, BorderStyle, BuiltinFont, Font, In, LineStyle, Pt};
use std::rc::Rc;

fn main() {
    // the built-in fonts never need to be embedded
    let courier = Rc::new(Font::builtin(BuiltinFont::Courier));
    let bold = Rc::new(Font::builtin(BuiltinFont::CourierBold));
    let body = TextStyle::new(courier.clone(), Pt(10.0), colours::BLACK).expect("valid style");
    let heading = TextStyle::new(bold, Pt(16.0), colours::BLUE).expect("valid style");
    let footer = TextStyle::new(courier, Pt(8.0), colours::BLACK).expect("valid style");

    // pages alternate their offset so the inner margin is wider for binding
    let mut mgr = LayoutManager::new(pdf_flow::writer::PdfDocument::default(), LETTER)
        .with_page_reactor(|page_num| if page_num % 2 == 1 { Pt(9.0) } else { Pt(-9.0) });

    let mut lp = mgr
        .logical_page_start_with_margins(Orientation::Portrait, Margins::all(In(0.75)))
        .expect("room for a body");

    // a footer stamped on every page of this logical page
    let footer_cell = Cell::builder(CellStyle::default().with_align(Align::TopCenter), lp.body_width())
        .add_text(Text::new(footer, "Quarterly inventory report"))
        .build()
        .expect("valid cell");
    lp.put_cell_as_header_footer(lp.body_left(), Pt(40.0), &footer_cell)
        .expect("can add footer");

    let title = Cell::builder(CellStyle::default(), lp.body_width())
        .add_text(Text::new(heading.clone(), "Inventory"))
        .add_text(Text::new(body.clone(), &lipsum::lipsum(120)))
        .build()
        .expect("valid cell");
    let x = lp.body_left();
    let top = lp.body_top();
    let end = lp.draw_cell(x, top, &title).expect("can draw the title");

    let table = Table::builder()
        .cell_widths(&[Pt(90.0), Pt(300.0), Pt(80.0)])
        .cell_style(CellStyle::default().with_border_style(BorderStyle::all(LineStyle::default())))
        .text_style(body.clone());
    let mut header = table.part_builder().cell_style(
        CellStyle::default()
            .with_bg_colour(Some(colours::LIGHT_GREY))
            .with_align(Align::MiddleCenter),
    );
    let mut row = header.row_builder();
    row.text_style(heading)
        .add_text_cells(&["SKU", "Description", "Count"])
        .expect("three columns");
    header = header.add_row(row.build().expect("complete row"));

    let mut rows = table.part_builder();
    for idx in 0..120 {
        let mut row = rows.row_builder();
        let sku = format!("W-{idx:04}");
        let count = (idx * 7 % 50).to_string();
        let description = lipsum::lipsum_words(5 + idx % 20);
        row.add_text_cells(&[sku.as_str(), description.as_str(), count.as_str()])
            .expect("three columns");
        rows = rows.add_row(row.build().expect("complete row"));
    }
    let table = table.add_part(header.build()).add_part(rows.build()).build();

    lp.draw_table(end.with_x(x).with_y(end.y - Pt(12.0)), &table)
        .expect("can draw the table");
    lp.commit().expect("can commit");

    let mut out = std::fs::File::create("report.pdf").expect("can create report.pdf");
    mgr.save(&mut out).expect("can write the pdf");
}
