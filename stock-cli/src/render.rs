use std::io::{self, Write};

use stock_core::Stock;

/// Одна строка списка: id, имя, цена с двумя знаками, минуты, тип
pub(crate) fn write_row<W: Write>(w: &mut W, s: &Stock) -> io::Result<()> {
    let kind = if s.is_procedure { "procedure" } else { "supply" };
    writeln!(
        w,
        "{:>4}  {:<24} {:>10.2}  {:>4} min  {kind}",
        s.id, s.name, s.price, s.minutes
    )
}

pub(crate) fn write_list<W: Write>(w: &mut W, stocks: &[Stock]) -> io::Result<()> {
    if stocks.is_empty() {
        return writeln!(w, "The file is empty");
    }
    for s in stocks {
        write_row(w, s)?;
    }
    Ok(())
}

/// Все поля записи; многострочное описание выводится с отступом
pub(crate) fn write_detail<W: Write>(w: &mut W, s: &Stock) -> io::Result<()> {
    writeln!(w, "Id:           {}", s.id)?;
    writeln!(w, "Name:         {}", s.name)?;
    let mut lines = s.description.lines();
    writeln!(w, "Description:  {}", lines.next().unwrap_or(""))?;
    for line in lines {
        writeln!(w, "              {line}")?;
    }
    writeln!(w, "Price:        {:.2}", s.price)?;
    writeln!(w, "Minutes:      {}", s.minutes)?;
    writeln!(w, "Procedure:    {}", if s.is_procedure { "yes" } else { "no" })
}
