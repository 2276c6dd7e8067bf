//! First-run seed data
//!
//! When no saved snapshot exists the deck starts from this fixed set of
//! groups, so a fresh install has something on screen immediately.

use crate::deck::Deck;
use crate::models::{Bookmark, Group, DEFAULT_GROUP_ID};

/// Edit time for seeded bookmarks, predating any real edit
const SEED_EDITED_TIME: i64 = 1;

/// The groups a brand new deck starts with
pub fn seed_groups() -> Vec<Group> {
    vec![default_group(), dev_group()]
}

/// A deck built from the seed groups
pub fn seed_deck() -> Deck {
    Deck::from_groups(seed_groups())
}

fn seeded(group_id: &str, id: &str, title: &str, url: &str, favicon: &str) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        favicon: favicon.to_string(),
        group_id: group_id.to_string(),
        edited_time: SEED_EDITED_TIME,
    }
}

fn default_group() -> Group {
    let mut group = Group::with_id(DEFAULT_GROUP_ID, "Default");
    group.bookmarks = [
        (
            "default-0",
            "Spotify",
            "https://open.spotify.com",
            "https://open.spotify.com/favicon.ico",
        ),
        (
            "default-1",
            "Youtube",
            "https://youtu.be/tsmPCi7NKrg?t=256",
            "https://s.ytimg.com/yts/img/favicon_32-vflOogEID.png",
        ),
        (
            "default-2",
            "Twitch",
            "https://twitch.tv",
            "https://twitch.tv/favicon.ico",
        ),
        (
            "default-3",
            "Wikipedia",
            "https://wikipedia.org",
            "https://wikipedia.org/favicon.ico",
        ),
        (
            "default-4",
            "Deviantart",
            "https://deviantart.com",
            "https://deviantart.com/favicon.ico",
        ),
        (
            "default-5",
            "Pinterest",
            "https://pinterest.com",
            "https://s.pinimg.com/webapp/favicon-56d11a6a.png",
        ),
        (
            "default-6",
            "Reddit",
            "https://reddit.com",
            "https://reddit.com/favicon.ico",
        ),
        (
            "default-7",
            "Ventusky",
            "https://ventusky.com",
            "https://ventusky.com/favicon.ico",
        ),
        (
            "default-8",
            "X",
            "https://x.com",
            "https://abs.twimg.com/favicons/twitter.3.ico",
        ),
    ]
    .into_iter()
    .map(|(id, title, url, favicon)| seeded(DEFAULT_GROUP_ID, id, title, url, favicon))
    .collect();
    group
}

fn dev_group() -> Group {
    let group_id = "kaosc-groupId";
    let mut group = Group::with_id(group_id, "Koosc Dev");
    group.bookmarks = [
        (
            "kaosc-1",
            "Kaosc",
            "https://kaosc.vercel.app",
            "https://kaosc.vercel.app/favicon.ico",
        ),
        (
            "kaosc-2",
            "Quick Copy",
            "https://play.google.com/store/apps/details?id=com.Kaosc.SrcKitab",
            "https://raw.githubusercontent.com/Kaosc/Kaosc/main/public/assets/products/quickcopy/logo.png",
        ),
        (
            "kaosc-3",
            "Driver Book",
            "https://play.google.com/store/apps/details?id=com.Kaosc.SrcKitab",
            "https://raw.githubusercontent.com/Kaosc/Kaosc/main/public/assets/products/driverbook/logo.png",
        ),
        (
            "kaosc-4",
            "Kavaklakerda",
            "https://kavaklakerda.vercel.app",
            "https://kavaklakerda.vercel.app/favicon.ico",
        ),
        (
            "kaosc-5",
            "Sunset Sunrise",
            "https://chrome.google.com/webstore/detail/sunset-sunrise/gkfelccnlfiipepkjfmgbkaebppelfma",
            "https://github.com/Kaosc/Kaosc/raw/main/public/assets/products/sunsetsunrise/logo.png",
        ),
        (
            "kaosc-6",
            "Cat Bot",
            "https://top.gg/bot/1052869011366477844",
            "https://raw.githubusercontent.com/Kaosc/discord-cat-bot/master/assets/cat_128.png",
        ),
        (
            "kaosc-7",
            "Hyle Theme",
            "https://marketplace.visualstudio.com/items?itemName=Kaosc.hyle",
            "https://github.com/Kaosc/Kaosc/raw/main/public/assets/products/hyletheme/logo.png",
        ),
    ]
    .into_iter()
    .map(|(id, title, url, favicon)| seeded(group_id, id, title, url, favicon))
    .collect();
    group
}
