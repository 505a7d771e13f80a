use std::fmt;

/// Store actions that can surface a user-facing failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreAction {
    FetchGames,
    CreateGame,
    LoadGame,
    StartGame,
    DeleteGame,
    GameAction,
}

impl fmt::Display for StoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreAction::FetchGames => "fetch_games",
            StoreAction::CreateGame => "create_game",
            StoreAction::LoadGame => "load_game",
            StoreAction::StartGame => "start_game",
            StoreAction::DeleteGame => "delete_game",
            StoreAction::GameAction => "game_action",
        };
        f.write_str(name)
    }
}

/// Language of the messages written to the store's `error` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Locale {
    #[default]
    ZhCn,
    En,
}

impl Locale {
    /// Fixed message shown when `action` fails. One per action, regardless of cause.
    pub fn failure_message(self, action: StoreAction) -> &'static str {
        match (self, action) {
            (Locale::ZhCn, StoreAction::FetchGames) => "获取游戏列表失败",
            (Locale::ZhCn, StoreAction::CreateGame) => "创建游戏失败",
            (Locale::ZhCn, StoreAction::LoadGame) => "加载游戏失败",
            (Locale::ZhCn, StoreAction::StartGame) => "开始游戏失败",
            (Locale::ZhCn, StoreAction::DeleteGame) => "删除游戏失败",
            (Locale::ZhCn, StoreAction::GameAction) => "执行操作失败",
            (Locale::En, StoreAction::FetchGames) => "Failed to fetch the game list",
            (Locale::En, StoreAction::CreateGame) => "Failed to create the game",
            (Locale::En, StoreAction::LoadGame) => "Failed to load the game",
            (Locale::En, StoreAction::StartGame) => "Failed to start the game",
            (Locale::En, StoreAction::DeleteGame) => "Failed to delete the game",
            (Locale::En, StoreAction::GameAction) => "Failed to perform the action",
        }
    }
}
