//! The sample game: one hidden coin, a few removal demos and a backpack.
use anyhow::Result;
use tile_core::{
    AddLayerOptions, Engine, EngineEvent, EventKey, InputSource, Item, ItemEvent, ItemSpec, MAP_LAYER,
    Renderer, SwitchOptions,
};
use tracing::info;

use crate::messages::MessageLog;

pub const BACKPACK_LAYER: &str = "backpack";
pub const ITEM_FOUND: &str = "itemfound";

/// Wires the sample game onto a fresh engine.
pub fn setup(
    engine: &mut Engine,
    messages: &MessageLog,
    backpack: impl Renderer + 'static,
) -> Result<()> {
    engine.add_layer(BACKPACK_LAYER, backpack, AddLayerOptions::default())?;

    let dollar = engine.add_item(
        4,
        15,
        ItemSpec::new("dollar", "$").hidden(true).with_life(10),
    )?;
    dollar.start_timer(5, |item: &mut Item| {
        item.set_visible(true);
        Ok(())
    })?;
    item_message(dollar, ItemEvent::Removed, messages, "*** (1) I am removed qq ***")?;
    item_message(dollar, ItemEvent::Enter, messages, "*** You found me! ***")?;
    item_message(dollar, ItemEvent::Leave, messages, "*** You leaved me qwq ***")?;

    // Removal by location, by name, and a mismatched name that keeps the star.
    let star = engine.add_item(3, 20, ItemSpec::new("star", "*"))?;
    item_message(star, ItemEvent::Removed, messages, "*** (2) I am removed qq ***")?;
    let (x, y) = (star.position().x, star.position().y);
    engine.remove_item(Some(x), Some(y), None)?;

    let star = engine.add_item(3, 20, ItemSpec::new("star", "*"))?;
    item_message(star, ItemEvent::Removed, messages, "*** (3) I am removed qq ***")?;
    let name = star.name().to_owned();
    engine.remove_item(None, None, Some(&name))?;

    let star = engine.add_item(3, 20, ItemSpec::new("star", "*"))?;
    item_message(star, ItemEvent::Removed, messages, "*** (4) I am removed qq ***")?;
    engine.remove_item(Some(3), Some(30), Some("not-star"))?;

    engine_message(engine, EngineEvent::OnStart, messages, "*** Game start ***")?;
    engine_message(engine, EngineEvent::UpdateMap, messages, "*** Map updated ***")?;
    engine_message(engine, EngineEvent::OnEnd, messages, "*** Game end ***")?;

    engine.add_event(ITEM_FOUND)?;
    engine_message(engine, ITEM_FOUND, messages, "*** An item is found!! ***")?;

    engine.bind("esc", "press", |engine: &mut Engine| {
        engine.end()?;
        Ok(())
    })?;
    engine.bind("b", "press", |engine: &mut Engine| {
        engine.switch_layer(BACKPACK_LAYER, SwitchOptions::default())?;
        Ok(())
    })?;
    engine.bind("m", "press", |engine: &mut Engine| {
        engine.switch_layer(MAP_LAYER, SwitchOptions::default())?;
        Ok(())
    })?;

    let log = messages.clone();
    let test = engine.bind("t", "press", move |_: &mut Engine| {
        log.push_text("Testing keyboard :DD");
        Ok(())
    })?;
    engine.unbind("t", "press", &test)?;

    info!("sample game ready");
    Ok(())
}

/// Runs the session to completion, logging the end of every day.
pub fn play<S: InputSource>(engine: &mut Engine, input: S, messages: &MessageLog) -> Result<()> {
    for day in engine.session(input) {
        let day = day.inspect_err(|e| messages.warn(format!("session stopped: {e}")))?;
        messages.push_text(format!("*** Day {day} ends ***"));
    }
    Ok(())
}

fn item_message(
    item: &mut Item,
    event: ItemEvent,
    messages: &MessageLog,
    text: &'static str,
) -> Result<()> {
    let log = messages.clone();
    item.on(event, move |_: &mut Item| {
        log.push_text(text);
        Ok(())
    })?;
    Ok(())
}

fn engine_message(
    engine: &mut Engine,
    event: impl Into<EventKey>,
    messages: &MessageLog,
    text: &'static str,
) -> Result<()> {
    let log = messages.clone();
    engine.on(event, move |engine: &mut Engine| {
        log.push_at(engine.timestamp().0, text);
        Ok(())
    })?;
    Ok(())
}
