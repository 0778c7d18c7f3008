use std::{collections::HashMap, fmt::Debug, path::PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{
    de::{self, Deserializer},
    Deserialize,
};

use crate::{
    action::{Action, ActionState, Command, PlayAction},
    scenes::SceneId,
};

const CONFIG: &str = include_str!("../.config/config.yaml");

parse_and_map_actions![(SceneId::Play, PlayAction, Command::Play)];

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AssetConfig {
    /// Banner font file. Defaults to `font.json` in the data directory.
    #[serde(default)]
    pub font: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub assets: AssetConfig,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let default_config: Config =
            serde_yaml::from_str(CONFIG).map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!("No configuration file found in {}, using defaults", config_dir.display());
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        for (scope, default_bindings) in default_config.keybindings.scenes.iter() {
            let user_bindings = cfg.keybindings.scenes.entry(scope.clone()).or_default();
            for (key, cmd) in default_bindings.iter() {
                user_bindings.entry(*key).or_insert_with(|| cmd.clone());
            }
        }
        let user_bindings = &mut cfg.keybindings.global;
        for (key, cmd) in default_config.keybindings.global.iter() {
            user_bindings.entry(*key).or_insert_with(|| cmd.clone());
        }
        if cfg.assets.font.is_none() {
            cfg.assets.font = default_config.assets.font;
        }

        Ok(cfg)
    }

    pub fn font_path(&self) -> PathBuf {
        match &self.assets.font {
            Some(path) => path.clone(),
            None => self.config._data_dir.join("font.json"),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct _RawSceneKeyBindings {
    pub click: Option<HashMap<String, String>>,
    pub hold: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct _RawKeyBindings {
    #[serde(default)]
    pub global: _RawSceneKeyBindings,
    #[serde(default)]
    pub scenes: HashMap<String, _RawSceneKeyBindings>,
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct SceneKeyBindings(pub HashMap<KeyEvent, Action>);

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: SceneKeyBindings,
    pub scenes: HashMap<SceneId, SceneKeyBindings>,
}

/// Strips event details that bindings never match on, such as keypad/lock state.
pub fn binding_key(key: KeyEvent) -> KeyEvent {
    KeyEvent::new_with_kind(key.code, key.modifiers, key.kind)
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_keybindings = _RawKeyBindings::deserialize(deserializer)?;

        let global = parse_scene_keybindings::<Command>(&raw_keybindings.global)
            .map_err(de::Error::custom)?
            .into_iter()
            .map(|(event, (command, state))| (event, Action { command, state }))
            .collect();
        let scenes = raw_keybindings
            .scenes
            .into_iter()
            .map(|(scene, keybindings)| match_scene_keybindings(&scene, keybindings))
            .collect::<Result<HashMap<_, _>, String>>()
            .map_err(de::Error::custom)?;

        Ok(KeyBindings { global: SceneKeyBindings(global), scenes })
    }
}

#[macro_export]
macro_rules! parse_and_map_actions {
    ( $( ( $scene_id_variant:path, $action_type:ty, $action_variant:path ) ),* ) => {
        fn match_scene_keybindings(
            scene: &str,
            raw_scene_keybindings: _RawSceneKeyBindings,
        ) -> Result<(SceneId, SceneKeyBindings), String> {
            let scene_id: SceneId = serde_plain::from_str(scene).map_err(|e| format!("Unknown scene `{scene}`: {e}"))?;
            let map = match scene_id {
                $(
                    $scene_id_variant => {
                        parse_scene_keybindings::<$action_type>(&raw_scene_keybindings)?
                            .into_iter()
                            .map(|(event, (command, state))| (event, Action { command: $action_variant(command), state }))
                            .collect()
                    },
                )*
            };

            Ok((scene_id, SceneKeyBindings(map)))
        }
    };
}

use parse_and_map_actions;

fn parse_binding_pairs<T>(map: &Option<HashMap<String, String>>) -> Result<HashMap<KeyEvent, T>, String>
where
    T: de::DeserializeOwned,
{
    let Some(inner_map) = map else { return Ok(HashMap::new()) };
    inner_map
        .iter()
        .map(|(key_str, action_str)| {
            let action: T =
                serde_plain::from_str(action_str).map_err(|e| format!("Unknown command `{action_str}`: {e}"))?;
            Ok((parse_key_event(key_str)?, action))
        })
        .collect()
}

fn parse_scene_keybindings<T>(raw: &_RawSceneKeyBindings) -> Result<HashMap<KeyEvent, (T, ActionState)>, String>
where
    T: de::DeserializeOwned + Clone + Debug,
{
    let click_keybindings = parse_binding_pairs(&raw.click)?;
    let hold_keybindings = parse_binding_pairs(&raw.hold)?;

    Ok(merge_keybinding_maps(click_keybindings, hold_keybindings))
}

/// Click bindings fire on press. Hold bindings fire on press, repeat and release, tagged
/// with the matching [`ActionState`].
fn merge_keybinding_maps<A: Clone>(
    click: HashMap<KeyEvent, A>,
    hold: HashMap<KeyEvent, A>,
) -> HashMap<KeyEvent, (A, ActionState)> {
    let mut merged: HashMap<KeyEvent, (A, ActionState)> =
        click.into_iter().map(|(event, command)| (event, (command, ActionState::default()))).collect();
    for (mut key_event, action) in hold {
        merged.insert(key_event, (action.clone(), ActionState::Start));
        key_event.kind = KeyEventKind::Release;
        merged.insert(key_event, (action.clone(), ActionState::End));
        key_event.kind = KeyEventKind::Repeat;
        merged.insert(key_event, (action, ActionState::Repeat));
    }

    merged
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{}`", raw));
    }
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    let raw = raw.strip_suffix('>').unwrap_or(raw);

    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            },
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            },
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            },
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        },
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        f if f.len() > 1 && f.starts_with('f') => {
            let n: u8 = f[1..].parse().map_err(|_| format!("Unable to parse {raw}"))?;
            if !(1..=12).contains(&n) {
                return Err(format!("Unable to parse {raw}"));
            }
            KeyCode::F(n)
        },
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().unwrap_or_default();
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

/// Inverse of [`parse_key_event`], without the angle brackets.
pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::Esc => "esc",
        KeyCode::F(n) => {
            char = format!("f{n}");
            &char
        },
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => {
            char = c.to_ascii_lowercase().to_string();
            &char
        },
        _ => "",
    };

    let mut keys = Vec::with_capacity(4);

    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        keys.push("ctrl");
    }

    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        keys.push("alt");
    }

    if key_event.modifiers.intersects(KeyModifiers::SHIFT) && key_event.code != KeyCode::BackTab {
        keys.push("shift");
    }

    keys.push(key_code);
    keys.join("-")
}
