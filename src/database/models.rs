use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct GuildModel {
    pub id: i32,
    pub guild_id: i64,
    pub prefix: String,
    pub colour: String,
    pub created_at: String,
}
