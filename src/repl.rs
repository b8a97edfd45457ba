//! Line-oriented command surface standing in for the original quoting form.
//! Each accepted command mutates the session, after which the whole derived
//! state is recomputed; unknown input prints an error and changes nothing.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::info;

use crate::domain::{
    Addon, Family, MarginPreset, QuoteSession, SizeTier, Vertical,
};
use crate::util::export;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetCost(f64),
    SetMargin(f64),
    SetPrice(f64),
    SetAddonMargin(f64),
    Family(Family),
    Size(SizeTier),
    Vertical(Vertical),
    AddonEnabled(Addon, bool),
    AddonSize(Addon, Option<SizeTier>),
    Preset(MarginPreset),
    Table(TableEdit),
    HighUsage(bool),
    AnnualBilling(bool),
    Show,
    Export(Option<PathBuf>),
    Reset,
    Help,
    Quit,
}

/// A point update to one price-book cell.
#[derive(Clone, Debug, PartialEq)]
pub enum TableEdit {
    SystemCost(Family, f64),
    Foam(SizeTier, f64),
    Sized(Addon, Family, SizeTier, f64),
    Flat(Addon, f64),
    AseBase(Family, SizeTier, f64),
    AseIncrement(Family, SizeTier, Addon, f64),
    SubscriptionBase(Family, f64),
}

/// Numeric coercion used everywhere on the input surface: anything that does
/// not parse counts as zero.
fn parse_money(token: &str) -> f64 {
    token.parse().unwrap_or(0.0)
}

fn parse_family(token: &str) -> Result<Family, String> {
    match token {
        "mp3" => Ok(Family::Mp3),
        "lv2" => Ok(Family::Lv2),
        other => Err(format!("unknown family `{other}` (mp3, lv2)")),
    }
}

fn parse_size(token: &str) -> Result<SizeTier, String> {
    match token {
        "s" => Ok(SizeTier::S),
        "m" => Ok(SizeTier::M),
        "l" => Ok(SizeTier::L),
        "xl" => Ok(SizeTier::Xl),
        other => Err(format!("unknown size `{other}` (s, m, l, xl)")),
    }
}

fn parse_addon(token: &str) -> Result<Addon, String> {
    Addon::ALL
        .into_iter()
        .find(|addon| addon.key() == token)
        .ok_or_else(|| format!("unknown add-on `{token}` (foam, booster, pool, solar, ups)"))
}

fn parse_toggle(token: &str) -> Result<bool, String> {
    match token {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected `on` or `off`, got `{other}`")),
    }
}

fn parse_vertical(token: &str) -> Result<Vertical, String> {
    match token {
        "residential" => Ok(Vertical::Residential),
        "commercial" => Ok(Vertical::Commercial),
        "industrial" => Ok(Vertical::Industrial),
        other => Err(format!(
            "unknown vertical `{other}` (residential, commercial, industrial)"
        )),
    }
}

fn parse_table(args: &[&str]) -> Result<TableEdit, String> {
    match args {
        ["system", family, value] => Ok(TableEdit::SystemCost(
            parse_family(family)?,
            parse_money(value),
        )),
        ["foam", size, value] => Ok(TableEdit::Foam(parse_size(size)?, parse_money(value))),
        [addon @ ("booster" | "pool"), family, size, value] => {
            let addon = parse_addon(addon)?;
            let size = parse_size(size)?;
            if size == SizeTier::Xl {
                return Err("only the foam table has an XL row".to_string());
            }
            Ok(TableEdit::Sized(
                addon,
                parse_family(family)?,
                size,
                parse_money(value),
            ))
        }
        [addon @ ("solar" | "ups"), value] => {
            Ok(TableEdit::Flat(parse_addon(addon)?, parse_money(value)))
        }
        ["ase", family, size, value] => {
            let size = parse_size(size)?;
            if size == SizeTier::Xl {
                return Err("ASE tables are keyed by system size (s, m, l)".to_string());
            }
            Ok(TableEdit::AseBase(
                parse_family(family)?,
                size,
                parse_money(value),
            ))
        }
        ["inc", family, size, addon, value] => {
            let size = parse_size(size)?;
            if size == SizeTier::Xl {
                return Err("ASE tables are keyed by system size (s, m, l)".to_string());
            }
            let addon = parse_addon(addon)?;
            if !addon.counts_toward_ase() {
                return Err("UPS has no ASE increment".to_string());
            }
            Ok(TableEdit::AseIncrement(
                parse_family(family)?,
                size,
                addon,
                parse_money(value),
            ))
        }
        ["sub", family, value] => Ok(TableEdit::SubscriptionBase(
            parse_family(family)?,
            parse_money(value),
        )),
        _ => Err("usage: table system|foam|booster|pool|solar|ups|ase|inc|sub ...".to_string()),
    }
}

pub fn parse(line: &str) -> Result<Command, String> {
    let raw: Vec<&str> = line.split_whitespace().collect();
    let lowered: Vec<String> = raw.iter().map(|token| token.to_lowercase()).collect();
    let tokens: Vec<&str> = lowered.iter().map(String::as_str).collect();

    match tokens.as_slice() {
        [] => Err(String::new()),
        ["set", "cost", value] => Ok(Command::SetCost(parse_money(value))),
        ["set", "margin", value] => Ok(Command::SetMargin(parse_money(value))),
        ["set", "price", value] => Ok(Command::SetPrice(parse_money(value))),
        ["set", "adders", value] => Ok(Command::SetAddonMargin(parse_money(value))),
        ["family", family] => Ok(Command::Family(parse_family(family)?)),
        ["size", size] => {
            let size = parse_size(size)?;
            if !SizeTier::SYSTEM.contains(&size) {
                return Err("systems come in s, m or l".to_string());
            }
            Ok(Command::Size(size))
        }
        ["vertical", vertical] => Ok(Command::Vertical(parse_vertical(vertical)?)),
        ["addon", addon, toggle @ ("on" | "off")] => Ok(Command::AddonEnabled(
            parse_addon(addon)?,
            parse_toggle(toggle)?,
        )),
        ["addon", addon, "size", "auto"] => Ok(Command::AddonSize(parse_addon(addon)?, None)),
        ["addon", addon, "size", size] => {
            let addon = parse_addon(addon)?;
            if !addon.is_sized() {
                return Err(format!("{} is flat-priced and has no size", addon.label()));
            }
            let size = parse_size(size)?;
            if size == SizeTier::Xl && addon != Addon::Foam {
                return Err("only foam comes in XL".to_string());
            }
            Ok(Command::AddonSize(addon, Some(size)))
        }
        ["preset", "residential"] => Ok(Command::Preset(MarginPreset::Residential)),
        ["preset", "commercial"] => Ok(Command::Preset(MarginPreset::Commercial)),
        ["table", rest @ ..] => Ok(Command::Table(parse_table(rest)?)),
        ["highusage", toggle] => Ok(Command::HighUsage(parse_toggle(toggle)?)),
        ["annual", toggle] => Ok(Command::AnnualBilling(parse_toggle(toggle)?)),
        ["show"] => Ok(Command::Show),
        ["export"] => Ok(Command::Export(None)),
        // Path casing matters; take it from the raw tokens.
        ["export", _] => Ok(Command::Export(Some(PathBuf::from(raw[1])))),
        ["reset"] => Ok(Command::Reset),
        ["help"] => Ok(Command::Help),
        ["quit" | "exit"] => Ok(Command::Quit),
        _ => Err(format!("unknown command `{line}`; try `help`")),
    }
}

fn apply_table_edit(session: &mut QuoteSession, edit: TableEdit) {
    match edit {
        TableEdit::SystemCost(family, value) => {
            session.book.set_system_cost_default(family, value);
        }
        TableEdit::Foam(size, value) => session.book.set_foam_cost(size, value),
        TableEdit::Sized(addon, family, size, value) => {
            session.book.set_sized_addon_cost(addon, family, size, value);
        }
        TableEdit::Flat(addon, value) => session.book.set_flat_addon_cost(addon, value),
        TableEdit::AseBase(family, size, value) => {
            session.book.set_ase_base(family, size, value);
        }
        TableEdit::AseIncrement(family, size, addon, value) => {
            session.book.set_ase_increment(family, size, addon, value);
        }
        TableEdit::SubscriptionBase(family, value) => {
            session.book.set_subscription_base(family, value);
        }
    }
}

/// Whether the loop keeps going after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn execute<W: Write>(
    session: &mut QuoteSession,
    command: Command,
    out: &mut W,
) -> io::Result<Flow> {
    match command {
        Command::SetCost(value) => session.set_cost(value),
        Command::SetMargin(value) => session.set_margin(value),
        Command::SetPrice(value) => session.set_price(value),
        Command::SetAddonMargin(value) => session.set_addon_margin(value),
        Command::Family(family) => session.set_family(family),
        Command::Size(size) => session.set_system_size(size),
        Command::Vertical(vertical) => session.set_vertical(vertical),
        Command::AddonEnabled(addon, on) => session.set_addon_enabled(addon, on),
        Command::AddonSize(addon, size) => session.set_addon_size_override(addon, size),
        Command::Preset(preset) => {
            session.apply_preset(preset);
            writeln!(out, "applied preset: {}", preset.label())?;
        }
        Command::Table(edit) => apply_table_edit(session, edit),
        Command::HighUsage(on) => session.set_high_usage(on),
        Command::AnnualBilling(on) => session.set_annual_billing(on),
        Command::Show => return write_summary(session, out).map(|()| Flow::Continue),
        Command::Export(Some(path)) => match export::write_snapshot(session, &path) {
            Ok(()) => {
                info!(path = %path.display(), "exported quote snapshot");
                writeln!(out, "exported to {}", path.display())?;
            }
            Err(err) => writeln!(out, "export failed: {err}")?,
        },
        Command::Export(None) => match export::to_json(&export::snapshot(session)) {
            Ok(json) => writeln!(out, "{json}")?,
            Err(err) => writeln!(out, "export failed: {err}")?,
        },
        Command::Reset => {
            session.reset();
            writeln!(out, "restored factory defaults")?;
        }
        Command::Help => write_help(out)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "commands:\n\
         \u{20} set cost|margin|price|adders <n>\n\
         \u{20} family mp3|lv2\n\
         \u{20} size s|m|l\n\
         \u{20} vertical residential|commercial|industrial\n\
         \u{20} addon <foam|booster|pool|solar|ups> on|off\n\
         \u{20} addon <name> size s|m|l|xl|auto\n\
         \u{20} preset residential|commercial\n\
         \u{20} table system <family> <n>          table foam <size> <n>\n\
         \u{20} table booster|pool <family> <size> <n>\n\
         \u{20} table solar|ups <n>                table ase <family> <size> <n>\n\
         \u{20} table inc <family> <size> <addon> <n>\n\
         \u{20} table sub <family> <n>\n\
         \u{20} highusage on|off    annual on|off\n\
         \u{20} show    export [path]    reset    help    quit"
    )
}

/// Live summary of the derived state.
pub fn write_summary<W: Write>(session: &QuoteSession, out: &mut W) -> io::Result<()> {
    let totals = session.totals();
    let resolved = session.resolved_addons();

    writeln!(
        out,
        "System {} (size {})",
        session.family.label(),
        session.system_size.label()
    )?;
    writeln!(
        out,
        "  cost {:>10.0}   margin {:>5.1}%   price {:>10.0}",
        session.base.cost,
        session.base.margin * 100.0,
        session.base.price
    )?;

    writeln!(out, "Add-ons (margin {:.1}%)", session.addon_margin * 100.0)?;
    for addon in Addon::ALL {
        match resolved.get(&addon).copied().flatten() {
            Some(r) => {
                let size = r.size.map_or("-", |s| s.label());
                let origin = if r.overridden {
                    "overridden"
                } else if r.size.is_some() {
                    "following system"
                } else {
                    "flat"
                };
                writeln!(
                    out,
                    "  {:<11} {:<3} cost {:>8.0}   price {:>8.0}   ({origin})",
                    addon.label(),
                    size,
                    r.cost,
                    r.price
                )?;
            }
            None => writeln!(out, "  {:<11} off", addon.label())?,
        }
    }

    writeln!(out, "Adders subtotal      {:>10.0}", totals.adders_total)?;
    writeln!(out, "ASE annual           {:>10.0}", totals.ase_annual)?;
    writeln!(
        out,
        "Subscription monthly {:>10.2}   ({}, {} billing)",
        totals.subscription_monthly,
        session.vertical.label(),
        if session.annual_billing { "annual" } else { "monthly" }
    )?;
    writeln!(out, "One-time total       {:>10.0}", totals.one_time_total)?;
    Ok(())
}

/// Drive the session from a line source until it runs dry or the user quits.
pub fn run<R: BufRead, W: Write>(
    session: &mut QuoteSession,
    input: R,
    out: &mut W,
    interactive: bool,
) -> io::Result<()> {
    if interactive {
        writeln!(out, "quote workbench; `help` lists commands")?;
        write!(out, "> ")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        match parse(&line) {
            Ok(command) => {
                if execute(session, command, out)? == Flow::Quit {
                    return Ok(());
                }
            }
            Err(message) if message.is_empty() => {}
            Err(message) => writeln!(out, "{message}")?,
        }
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    Ok(())
}
