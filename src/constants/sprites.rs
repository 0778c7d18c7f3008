// Text art, one cell per character. Spaces are transparent.

pub const BACKGROUND_TILE: &str = r#"
                                             
        .--.                                 
     .-(    ).                 .--.          
    (___.__)__)             .-(    )-.       
                           (___.__.___)      
                                             
                 _                           
                / \                          
     _   ___   |   |    __      _     ___    
    | | |   |__|   |   |  | ___| |   |   |   
 ___| |_|   |  |   |___|  ||   | |___|   |___
|   | | |   |  |   |   |  ||   | |   |   |   |
"#;

pub const ROAD_TILE: &str = r#"
▀▀▀▀▀▀▀▀
╱╱ ╱╱ ╱╱
"#;

// Row 0 is the pipe body, row 1 the cap drawn at the gap edge.
pub const PIPE_TILE: &str = r#"
▐███▌
█████
"#;

// Climbing, gliding, diving.
pub const BIRD_FRAMES: [&str; 3] = [
    r#"
 ,_/
(o>
"#,
    r#"
 __
(o>=
"#,
    r#"
(o\
 `v
"#,
];
